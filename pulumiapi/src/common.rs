//! Shared value types used across resource families.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An encrypted secret value. `value` is plaintext when `secret` is false
/// and ciphertext otherwise; ciphertext is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecretValue {
    pub value: String,
    pub secret: bool,
}

impl SecretValue {
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: false,
        }
    }

    pub fn ciphertext(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: true,
        }
    }
}

// The wire format is asymmetric: requests carry `{"secret": v}` for secret
// values, responses carry `{"ciphertext": c}` for them. Plain values are
// bare strings in both directions.
impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.secret {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("secret", &self.value)?;
            map.end()
        } else {
            serializer.serialize_str(&self.value)
        }
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Cipher { ciphertext: String },
            Plain(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Cipher { ciphertext } => SecretValue {
                value: ciphertext,
                secret: true,
            },
            Wire::Plain(value) => SecretValue {
                value,
                secret: false,
            },
        })
    }
}

#[derive(Debug, Error)]
#[error("invalid duration {0:?}")]
pub struct ParseDurationError(String);

/// A duration serialized in the service's unit-suffixed string form,
/// e.g. `"1h30m0s"` or `"300ms"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulumiDuration(pub Duration);

impl PulumiDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }
}

impl From<Duration> for PulumiDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl fmt::Display for PulumiDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.0.as_millis();
        if total_ms == 0 {
            return write!(f, "0s");
        }
        if total_ms < 1000 {
            return write!(f, "{total_ms}ms");
        }
        let total_secs = total_ms / 1000;
        let ms = total_ms % 1000;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let secs = total_secs % 60;
        if hours > 0 {
            write!(f, "{hours}h{minutes}m{secs}s")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m{secs}s")?;
        } else {
            write!(f, "{secs}s")?;
        }
        if ms > 0 {
            write!(f, "{ms}ms")?;
        }
        Ok(())
    }
}

impl FromStr for PulumiDuration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseDurationError(s.to_string()));
        }
        let mut total_ms = 0f64;
        let mut rest = s;
        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .ok_or_else(|| ParseDurationError(s.to_string()))?;
            if digits_end == 0 {
                return Err(ParseDurationError(s.to_string()));
            }
            let value: f64 = rest[..digits_end]
                .parse()
                .map_err(|_| ParseDurationError(s.to_string()))?;
            rest = &rest[digits_end..];
            let (unit_ms, unit_len) = if rest.starts_with("ms") {
                (1.0, 2)
            } else if rest.starts_with('h') {
                (3_600_000.0, 1)
            } else if rest.starts_with('m') {
                (60_000.0, 1)
            } else if rest.starts_with('s') {
                (1_000.0, 1)
            } else {
                return Err(ParseDurationError(s.to_string()));
            };
            total_ms += value * unit_ms;
            rest = &rest[unit_len..];
        }
        Ok(Self(Duration::from_millis(total_ms as u64)))
    }
}

impl Serialize for PulumiDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PulumiDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_value_serializes_plaintext_as_bare_string() {
        let v = SecretValue::plaintext("hunter2");
        assert_eq!(serde_json::to_string(&v).unwrap(), r#""hunter2""#);
    }

    #[test]
    fn secret_value_serializes_secret_as_workflow_object() {
        let v = SecretValue::ciphertext("AAAbbb==");
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"secret":"AAAbbb=="}"#
        );
    }

    #[test]
    fn secret_value_deserializes_ciphertext_object() {
        let v: SecretValue = serde_json::from_str(r#"{"ciphertext":"AAAbbb=="}"#).unwrap();
        assert_eq!(v, SecretValue::ciphertext("AAAbbb=="));
    }

    #[test]
    fn secret_value_deserializes_bare_string_as_plaintext() {
        let v: SecretValue = serde_json::from_str(r#""hunter2""#).unwrap();
        assert_eq!(v, SecretValue::plaintext("hunter2"));
    }

    #[test]
    fn duration_round_trips_common_forms() {
        for (input, expect_secs) in [
            ("1h30m0s", 5400),
            ("2m0s", 120),
            ("45s", 45),
            ("0s", 0),
        ] {
            let d: PulumiDuration = input.parse().unwrap();
            assert_eq!(d.0.as_secs(), expect_secs, "{input}");
            assert_eq!(d.to_string(), input);
        }
    }

    #[test]
    fn duration_parses_fractional_and_millisecond_units() {
        let d: PulumiDuration = "1.5h".parse().unwrap();
        assert_eq!(d.0.as_secs(), 5400);

        let d: PulumiDuration = "300ms".parse().unwrap();
        assert_eq!(d.0.as_millis(), 300);
        assert_eq!(d.to_string(), "300ms");
    }

    #[test]
    fn duration_rejects_garbage() {
        assert!("".parse::<PulumiDuration>().is_err());
        assert!("h".parse::<PulumiDuration>().is_err());
        assert!("10x".parse::<PulumiDuration>().is_err());
        assert!("10".parse::<PulumiDuration>().is_err());
    }

    #[test]
    fn duration_json_codec() {
        let d = PulumiDuration::from_secs(90);
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""1m30s""#);
        let back: PulumiDuration = serde_json::from_str(r#""1m30s""#).unwrap();
        assert_eq!(back, d);
    }
}
