use std::collections::BTreeMap;

/// Dynamically-typed key-value mapping passed across the provider boundary.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// One value in a property bag. Numbers are always 64-bit floats, matching
/// the wire encoding; integer fields widen through `f64` on the way in and
/// out.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    Secret(Box<PropertyValue>),
}

impl PropertyValue {
    pub fn secret(value: PropertyValue) -> PropertyValue {
        PropertyValue::Secret(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret(_))
    }

    /// The value itself, or the wrapped value for secrets.
    pub fn unwrap_secret(&self) -> &PropertyValue {
        match self {
            PropertyValue::Secret(inner) => inner.unwrap_secret(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
    }
}

/// Plaintext of a possibly-secret string property. Absent or null entries
/// read as the empty string.
pub fn get_secret_or_string_value(prop: Option<&PropertyValue>) -> String {
    get_secret_or_string_nullable_value(prop).unwrap_or_default()
}

pub fn get_secret_or_string_nullable_value(prop: Option<&PropertyValue>) -> Option<String> {
    match prop?.unwrap_secret() {
        PropertyValue::Null => None,
        PropertyValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn get_secret_or_bool_value(prop: Option<&PropertyValue>) -> bool {
    prop.and_then(|p| p.unwrap_secret().as_bool())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_accessors_see_through_the_wrapper() {
        let plain = PropertyValue::from("hunter2");
        let wrapped = PropertyValue::secret(PropertyValue::from("hunter2"));
        assert_eq!(get_secret_or_string_value(Some(&plain)), "hunter2");
        assert_eq!(get_secret_or_string_value(Some(&wrapped)), "hunter2");
        assert_eq!(get_secret_or_string_value(None), "");
    }

    #[test]
    fn nullable_accessor_distinguishes_absent_from_empty() {
        assert_eq!(get_secret_or_string_nullable_value(None), None);
        assert_eq!(
            get_secret_or_string_nullable_value(Some(&PropertyValue::Null)),
            None
        );
        assert_eq!(
            get_secret_or_string_nullable_value(Some(&PropertyValue::from(""))),
            Some(String::new())
        );
    }

    #[test]
    fn bool_accessor_defaults_to_false() {
        assert!(!get_secret_or_bool_value(None));
        assert!(get_secret_or_bool_value(Some(&PropertyValue::secret(
            PropertyValue::Bool(true)
        ))));
    }
}
