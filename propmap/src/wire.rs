use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::de::from_property_map;
use crate::error::PropertyError;
use crate::ser::to_property_map;
use crate::value::{PropertyMap, PropertyValue};

/// Special key marking a wire object as carrying an out-of-band type.
pub const SIG_KEY: &str = "4dabf18193072939515e22adb298388d";
/// Signature value identifying a secret wrapper object.
pub const SECRET_SIG: &str = "1b47061264138c4ac30d75fd1eb44270";

/// Marshal a struct into the provider wire encoding: a JSON object where
/// secrets appear as signature-tagged wrapper objects.
pub fn to_properties<T: Serialize>(value: &T) -> Result<Value, PropertyError> {
    let map = to_property_map(value)?;
    Ok(Value::Object(map_to_wire(&map)))
}

/// Unmarshal the provider wire encoding into a struct. Nulls are skipped
/// and secret wrappers are unwrapped into secret-tagged values before
/// decoding.
pub fn from_properties<T: DeserializeOwned>(props: &Value) -> Result<T, PropertyError> {
    let map = property_map_from_wire(props)?;
    from_property_map(&map)
}

/// Decode a wire object into a property bag without binding to a struct.
pub fn property_map_from_wire(props: &Value) -> Result<PropertyMap, PropertyError> {
    match props {
        Value::Object(obj) => Ok(obj
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), value_from_wire(v)))
            .collect()),
        _ => Err(PropertyError::NotAStruct),
    }
}

/// Encode a property bag as a wire object.
pub fn property_map_to_wire(map: &PropertyMap) -> Value {
    Value::Object(map_to_wire(map))
}

fn map_to_wire(map: &PropertyMap) -> Map<String, Value> {
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), value_to_wire(v)))
        .collect()
}

fn value_to_wire(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Null => Value::Null,
        PropertyValue::Bool(b) => Value::Bool(*b),
        PropertyValue::Number(n) => Value::from(*n),
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::Array(items) => Value::Array(items.iter().map(value_to_wire).collect()),
        PropertyValue::Object(map) => Value::Object(map_to_wire(map)),
        PropertyValue::Secret(inner) => json!({
            SIG_KEY: SECRET_SIG,
            "value": value_to_wire(inner),
        }),
    }
}

fn value_from_wire(value: &Value) -> PropertyValue {
    match value {
        Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or_default()),
        Value::String(s) => PropertyValue::String(s.clone()),
        Value::Array(items) => {
            PropertyValue::Array(items.iter().map(value_from_wire).collect())
        }
        Value::Object(obj) => {
            if obj.get(SIG_KEY).and_then(Value::as_str) == Some(SECRET_SIG) {
                let inner = obj.get("value").map(value_from_wire).unwrap_or(PropertyValue::Null);
                return PropertyValue::secret(inner);
            }
            PropertyValue::Object(
                obj.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), value_from_wire(v)))
                    .collect(),
            )
        }
    }
}
