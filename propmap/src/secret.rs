use pulumiapi::SecretValue;

use crate::value::{PropertyMap, PropertyValue};

/// Stand-in plaintext for imported secrets; generated programs carry it
/// until the user pastes the real value.
pub const IMPORT_PLACEHOLDER: &str = "<REPLACE WITH ACTUAL SECRET VALUE>";

fn secret_string(s: &str) -> PropertyValue {
    PropertyValue::secret(PropertyValue::String(s.to_string()))
}

/// Secret handling on create or update. The input was just supplied by the
/// user, so the plaintext is known; outputs only ever hold ciphertext.
pub fn create_secret_value(
    map: &mut PropertyMap,
    property_name: &str,
    cipher_value: &SecretValue,
    plaintext_value: &SecretValue,
    is_input: bool,
) {
    let value = if is_input {
        secret_string(&plaintext_value.value)
    } else {
        PropertyValue::String(cipher_value.value.clone())
    };
    map.insert(property_name.to_string(), value);
}

/// Secret handling on import. The service only returns ciphertext, so the
/// input gets a placeholder the user must replace by hand.
pub fn import_secret_value(
    map: &mut PropertyMap,
    property_name: &str,
    cipher_value: &SecretValue,
    is_input: bool,
) {
    let value = if is_input {
        secret_string(IMPORT_PLACEHOLDER)
    } else {
        PropertyValue::String(cipher_value.value.clone())
    };
    map.insert(property_name.to_string(), value);
}

/// Secret handling on refresh. Outputs are overwritten with the ciphertext
/// read from the service. For inputs, an unchanged ciphertext means the
/// previously-known plaintext is still valid and survives; a changed or
/// missing prior ciphertext means the plaintext is unknowable and resets to
/// empty, to be re-supplied by the user.
pub fn merge_secret_value(
    map: &mut PropertyMap,
    property_name: &str,
    cipher_value: &SecretValue,
    plaintext_value: Option<&SecretValue>,
    old_cipher_value: Option<&SecretValue>,
    is_input: bool,
) {
    let value = if is_input {
        let unchanged = old_cipher_value.is_some_and(|old| old.value == cipher_value.value);
        if unchanged {
            secret_string(plaintext_value.map(|p| p.value.as_str()).unwrap_or(""))
        } else {
            secret_string("")
        }
    } else {
        PropertyValue::String(cipher_value.value.clone())
    };
    map.insert(property_name.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(v: &str) -> SecretValue {
        SecretValue::ciphertext(v)
    }

    fn plain(v: &str) -> SecretValue {
        SecretValue::plaintext(v)
    }

    #[test]
    fn create_wraps_input_plaintext() {
        let mut map = PropertyMap::new();
        create_secret_value(&mut map, "value", &cipher("AAAA"), &plain("hunter2"), true);
        assert_eq!(map["value"], secret_string("hunter2"));
    }

    #[test]
    fn create_stores_output_ciphertext_unwrapped() {
        let mut map = PropertyMap::new();
        create_secret_value(&mut map, "value", &cipher("AAAA"), &plain("hunter2"), false);
        assert_eq!(map["value"], PropertyValue::from("AAAA"));
    }

    #[test]
    fn import_always_uses_the_placeholder_for_inputs() {
        let mut map = PropertyMap::new();
        import_secret_value(&mut map, "value", &cipher("AAAA"), true);
        assert_eq!(map["value"], secret_string(IMPORT_PLACEHOLDER));

        import_secret_value(&mut map, "value", &cipher("BBBB"), true);
        assert_eq!(map["value"], secret_string(IMPORT_PLACEHOLDER));
    }

    #[test]
    fn import_stores_output_ciphertext() {
        let mut map = PropertyMap::new();
        import_secret_value(&mut map, "value", &cipher("AAAA"), false);
        assert_eq!(map["value"], PropertyValue::from("AAAA"));
    }

    #[test]
    fn merge_preserves_plaintext_when_ciphertext_is_unchanged() {
        let mut map = PropertyMap::new();
        merge_secret_value(
            &mut map,
            "value",
            &cipher("AAAA"),
            Some(&plain("hunter2")),
            Some(&cipher("AAAA")),
            true,
        );
        assert_eq!(map["value"], secret_string("hunter2"));
    }

    #[test]
    fn merge_blanks_plaintext_when_ciphertext_changed() {
        let mut map = PropertyMap::new();
        merge_secret_value(
            &mut map,
            "value",
            &cipher("BBBB"),
            Some(&plain("hunter2")),
            Some(&cipher("AAAA")),
            true,
        );
        assert_eq!(map["value"], secret_string(""));
    }

    #[test]
    fn merge_blanks_plaintext_when_no_prior_ciphertext() {
        let mut map = PropertyMap::new();
        merge_secret_value(&mut map, "value", &cipher("AAAA"), None, None, true);
        assert_eq!(map["value"], secret_string(""));
    }

    #[test]
    fn merge_overwrites_outputs_with_ciphertext() {
        let mut map = PropertyMap::new();
        map.insert("value".to_string(), secret_string("stale"));
        merge_secret_value(
            &mut map,
            "value",
            &cipher("CCCC"),
            Some(&plain("hunter2")),
            Some(&cipher("CCCC")),
            false,
        );
        assert_eq!(map["value"], PropertyValue::from("CCCC"));
    }
}
