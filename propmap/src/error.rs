use std::fmt::Display;

use thiserror::Error;

/// Conversion failures between typed values and property bags.
///
/// `NotAStruct` marks a programmer error (the value handed in cannot map to
/// a property bag at all); `TypeMismatch` is a data error the caller is
/// expected to surface as an operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("value must be a struct or map")]
    NotAStruct,
    #[error("field type {expected:?} does not match property {found:?}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0}")]
    Message(String),
}

impl PropertyError {
    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        PropertyError::TypeMismatch { expected, found }
    }
}

impl serde::ser::Error for PropertyError {
    fn custom<T: Display>(msg: T) -> Self {
        PropertyError::Message(msg.to_string())
    }
}

impl serde::de::Error for PropertyError {
    fn custom<T: Display>(msg: T) -> Self {
        PropertyError::Message(msg.to_string())
    }
}
