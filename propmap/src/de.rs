use std::collections::btree_map;

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor,
};

use crate::error::PropertyError;
use crate::value::{PropertyMap, PropertyValue};

/// Unmarshal a property bag into a struct. Keys missing from the bag leave
/// the field at its default, so destination structs use `Option` or
/// `#[serde(default)]` for anything a caller may omit; validation of
/// required fields is the caller's job. Secret wrappers are looked through
/// transparently.
pub fn from_property_map<T: DeserializeOwned>(map: &PropertyMap) -> Result<T, PropertyError> {
    T::deserialize(PropertyMapDeserializer { map })
}

pub fn from_property_value<T: DeserializeOwned>(value: &PropertyValue) -> Result<T, PropertyError> {
    T::deserialize(PropertyValueDeserializer { value })
}

fn type_name(value: &PropertyValue) -> &'static str {
    match value {
        PropertyValue::Null => "null",
        PropertyValue::Bool(_) => "bool",
        PropertyValue::Number(_) => "number",
        PropertyValue::String(_) => "string",
        PropertyValue::Array(_) => "array",
        PropertyValue::Object(_) => "object",
        PropertyValue::Secret(_) => "secret",
    }
}

struct PropertyMapDeserializer<'a> {
    map: &'a PropertyMap,
}

impl<'de, 'a> de::Deserializer<'de> for PropertyMapDeserializer<'a> {
    type Error = PropertyError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        visitor.visit_map(MapDeserializer {
            iter: self.map.iter(),
            value: None,
        })
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        visitor.visit_some(self)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        self.deserialize_any(visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        self.deserialize_any(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string bytes
        byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        enum identifier
    }
}

#[derive(Clone, Copy)]
struct PropertyValueDeserializer<'a> {
    value: &'a PropertyValue,
}

impl<'a> PropertyValueDeserializer<'a> {
    fn plain(&self) -> &'a PropertyValue {
        self.value.unwrap_secret()
    }

    fn mismatch(&self, expected: &'static str) -> PropertyError {
        PropertyError::mismatch(expected, type_name(self.plain()))
    }

    fn number(&self, expected: &'static str) -> Result<f64, PropertyError> {
        match self.plain() {
            PropertyValue::Number(n) => Ok(*n),
            _ => Err(self.mismatch(expected)),
        }
    }
}

// Numeric targets truncate through f64; out-of-range and fractional values
// are not rejected.
macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
            visitor.$visit(self.number(stringify!($ty))? as $ty)
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for PropertyValueDeserializer<'a> {
    type Error = PropertyError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::Null => visitor.visit_unit(),
            PropertyValue::Bool(b) => visitor.visit_bool(*b),
            PropertyValue::Number(n) => visitor.visit_f64(*n),
            PropertyValue::String(s) => visitor.visit_str(s),
            PropertyValue::Array(items) => visitor.visit_seq(SeqDeserializer {
                iter: items.iter(),
            }),
            PropertyValue::Object(map) => visitor.visit_map(MapDeserializer {
                iter: map.iter(),
                value: None,
            }),
            PropertyValue::Secret(inner) => {
                PropertyValueDeserializer { value: inner }.deserialize_any(visitor)
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::Bool(b) => visitor.visit_bool(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    deserialize_integer!(deserialize_i8, visit_i8, i8);
    deserialize_integer!(deserialize_i16, visit_i16, i16);
    deserialize_integer!(deserialize_i32, visit_i32, i32);
    deserialize_integer!(deserialize_i64, visit_i64, i64);
    deserialize_integer!(deserialize_u8, visit_u8, u8);
    deserialize_integer!(deserialize_u16, visit_u16, u16);
    deserialize_integer!(deserialize_u32, visit_u32, u32);
    deserialize_integer!(deserialize_u64, visit_u64, u64);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        visitor.visit_f32(self.number("f32")? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        visitor.visit_f64(self.number("f64")?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::String(s) => visitor.visit_str(s),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        self.deserialize_any(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        self.deserialize_any(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::Array(items) => visitor.visit_seq(SeqDeserializer {
                iter: items.iter(),
            }),
            _ => Err(self.mismatch("array")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::Object(map) => visitor.visit_map(MapDeserializer {
                iter: map.iter(),
                value: None,
            }),
            _ => Err(self.mismatch("object")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        match self.plain() {
            PropertyValue::String(s) => {
                visitor.visit_enum(s.as_str().into_deserializer())
            }
            PropertyValue::Object(map) => {
                let mut iter = map.iter();
                let (variant, value) = iter
                    .next()
                    .ok_or_else(|| PropertyError::Message("empty enum object".into()))?;
                if iter.next().is_some() {
                    return Err(PropertyError::Message(
                        "enum object must have a single key".into(),
                    ));
                }
                visitor.visit_enum(EnumDeserializer { variant, value })
            }
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        visitor.visit_unit()
    }
}

struct SeqDeserializer<'a> {
    iter: std::slice::Iter<'a, PropertyValue>,
}

impl<'de, 'a> SeqAccess<'de> for SeqDeserializer<'a> {
    type Error = PropertyError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, PropertyError> {
        match self.iter.next() {
            Some(value) => seed
                .deserialize(PropertyValueDeserializer { value })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'a> {
    iter: btree_map::Iter<'a, String, PropertyValue>,
    value: Option<&'a PropertyValue>,
}

impl<'de, 'a> MapAccess<'de> for MapDeserializer<'a> {
    type Error = PropertyError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, PropertyError> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.as_str().into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, PropertyError> {
        let value = self
            .value
            .take()
            .ok_or_else(|| PropertyError::Message("value without a key".into()))?;
        seed.deserialize(PropertyValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'a> {
    variant: &'a str,
    value: &'a PropertyValue,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumDeserializer<'a> {
    type Error = PropertyError;
    type Variant = VariantDeserializer<'a>;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), PropertyError> {
        let variant = seed.deserialize(self.variant.into_deserializer())?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'a> {
    value: &'a PropertyValue,
}

impl<'de, 'a> de::VariantAccess<'de> for VariantDeserializer<'a> {
    type Error = PropertyError;

    fn unit_variant(self) -> Result<(), PropertyError> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, PropertyError> {
        seed.deserialize(PropertyValueDeserializer { value: self.value })
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        de::Deserializer::deserialize_tuple(
            PropertyValueDeserializer { value: self.value },
            len,
            visitor,
        )
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, PropertyError> {
        de::Deserializer::deserialize_struct(
            PropertyValueDeserializer { value: self.value },
            "",
            fields,
            visitor,
        )
    }
}
