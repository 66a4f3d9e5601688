use serde::ser::{self, Serialize};

use crate::error::PropertyError;
use crate::value::{PropertyMap, PropertyValue};

/// Marshal a struct into a property bag. Fields are keyed by their serde
/// rename (or field name); `None` fields are dropped rather than stored as
/// nulls. Values that do not serialize to a map fail with `NotAStruct`.
pub fn to_property_map<T: Serialize>(value: &T) -> Result<PropertyMap, PropertyError> {
    match to_property_value(value)? {
        PropertyValue::Object(map) => Ok(map),
        _ => Err(PropertyError::NotAStruct),
    }
}

pub fn to_property_value<T: Serialize>(value: &T) -> Result<PropertyValue, PropertyError> {
    value.serialize(PropertySerializer)
}

struct PropertySerializer;

impl ser::Serializer for PropertySerializer {
    type Ok = PropertyValue;
    type Error = PropertyError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeArray;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeObject;

    fn serialize_bool(self, v: bool) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i16(self, v: i16) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i32(self, v: i32) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i64(self, v: i64) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u8(self, v: u8) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u16(self, v: u16) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u32(self, v: u32) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u64(self, v: u64) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f32(self, v: f32) -> Result<PropertyValue, PropertyError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Array(
            v.iter().map(|b| PropertyValue::Number(*b as f64)).collect(),
        ))
    }

    fn serialize_none(self) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(
        self,
        value: &T,
    ) -> Result<PropertyValue, PropertyError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<PropertyValue, PropertyError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<PropertyValue, PropertyError> {
        let mut map = PropertyMap::new();
        map.insert(variant.to_string(), value.serialize(PropertySerializer)?);
        Ok(PropertyValue::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, PropertyError> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, PropertyError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, PropertyError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<SerializeArray, PropertyError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeObject, PropertyError> {
        Ok(SerializeObject {
            entries: PropertyMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeObject, PropertyError> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeObject, PropertyError> {
        self.serialize_map(None)
    }
}

struct SerializeArray {
    items: Vec<PropertyValue>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PropertyError> {
        self.items.push(value.serialize(PropertySerializer)?);
        Ok(())
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PropertyError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PropertyError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeArray {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PropertyError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeObject {
    entries: PropertyMap,
    pending_key: Option<String>,
}

impl SerializeObject {
    // Nulls are dropped on marshal; absent and null are the same thing in a
    // property bag.
    fn insert(&mut self, key: String, value: PropertyValue) {
        if !value.is_null() {
            self.entries.insert(key, value);
        }
    }
}

impl ser::SerializeMap for SerializeObject {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), PropertyError> {
        match key.serialize(PropertySerializer)? {
            PropertyValue::String(s) => {
                self.pending_key = Some(s);
                Ok(())
            }
            _ => Err(PropertyError::Message("map key must be a string".into())),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PropertyError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| PropertyError::Message("map value without a key".into()))?;
        let value = value.serialize(PropertySerializer)?;
        self.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Object(self.entries))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), PropertyError> {
        let value = value.serialize(PropertySerializer)?;
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        Ok(PropertyValue::Object(self.entries))
    }
}

impl ser::SerializeStructVariant for SerializeObject {
    type Ok = PropertyValue;
    type Error = PropertyError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), PropertyError> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<PropertyValue, PropertyError> {
        ser::SerializeStruct::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TokenArgs {
        #[serde(rename = "name")]
        name: String,
        #[serde(rename = "admin")]
        admin: bool,
        #[serde(rename = "maxAgeSeconds")]
        max_age_seconds: i64,
        #[serde(rename = "description")]
        description: Option<String>,
    }

    #[test]
    fn struct_fields_land_under_renamed_keys() {
        let args = TokenArgs {
            name: "deploy".into(),
            admin: true,
            max_age_seconds: 3600,
            description: Some("ci".into()),
        };
        let map = to_property_map(&args).unwrap();
        assert_eq!(map["name"], PropertyValue::from("deploy"));
        assert_eq!(map["admin"], PropertyValue::Bool(true));
        assert_eq!(map["maxAgeSeconds"], PropertyValue::Number(3600.0));
        assert_eq!(map["description"], PropertyValue::from("ci"));
    }

    #[test]
    fn none_fields_are_dropped() {
        let args = TokenArgs {
            name: "deploy".into(),
            admin: false,
            max_age_seconds: 0,
            description: None,
        };
        let map = to_property_map(&args).unwrap();
        assert!(!map.contains_key("description"));
    }

    #[test]
    fn non_struct_input_is_a_shape_error() {
        assert_eq!(to_property_map(&42_i64), Err(PropertyError::NotAStruct));
        assert_eq!(
            to_property_map(&vec!["a", "b"]),
            Err(PropertyError::NotAStruct)
        );
    }

    #[test]
    fn integers_widen_to_numbers() {
        assert_eq!(
            to_property_value(&7_u32).unwrap(),
            PropertyValue::Number(7.0)
        );
        assert_eq!(
            to_property_value(&-7_i32).unwrap(),
            PropertyValue::Number(-7.0)
        );
    }

    #[test]
    fn nested_structs_become_objects() {
        #[derive(Serialize)]
        struct Outer {
            inner: Inner,
            values: Vec<i64>,
        }
        #[derive(Serialize)]
        struct Inner {
            flag: bool,
        }

        let map = to_property_map(&Outer {
            inner: Inner { flag: true },
            values: vec![1, 2],
        })
        .unwrap();
        let PropertyValue::Object(inner) = &map["inner"] else {
            panic!("expected object");
        };
        assert_eq!(inner["flag"], PropertyValue::Bool(true));
        assert_eq!(
            map["values"],
            PropertyValue::Array(vec![PropertyValue::Number(1.0), PropertyValue::Number(2.0)])
        );
    }
}
