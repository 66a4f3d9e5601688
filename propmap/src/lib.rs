//! Marshalling between typed Rust values and the dynamic property bags that
//! cross the resource-provider boundary, plus the secret merge policy and
//! the property diff engine shared by every resource's CRUD handlers.

pub mod de;
pub mod diff;
pub mod error;
pub mod secret;
pub mod ser;
pub mod value;
pub mod wire;

pub use de::{from_property_map, from_property_value};
pub use diff::{
    diff_olds_and_news, standard_diff, DiffChanges, DiffKind, DiffResponse, PropertyDiff,
};
pub use error::PropertyError;
pub use secret::{
    create_secret_value, import_secret_value, merge_secret_value, IMPORT_PLACEHOLDER,
};
pub use ser::{to_property_map, to_property_value};
pub use value::{
    get_secret_or_bool_value, get_secret_or_string_nullable_value, get_secret_or_string_value,
    PropertyMap, PropertyValue,
};
pub use wire::{from_properties, to_properties, SECRET_SIG, SIG_KEY};
