//! Tolerant integer identifier.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Integer identifier that decodes from a JSON number or a quoted decimal
/// string.
///
/// The provider is inconsistent about numeric encoding: some events carry
/// `placeID` as a number, others as a string. Either form decodes to the same
/// value; anything else fails the decode outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntId(i64);

impl IntId {
    /// Wraps a raw identifier value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the identifier as a plain integer.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for IntId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for IntId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for IntId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for IntId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IntIdVisitor;

        impl Visitor<'_> for IntIdVisitor {
            type Value = IntId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<IntId, E> {
                Ok(IntId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<IntId, E> {
                i64::try_from(value).map(IntId).map_err(|_| {
                    E::invalid_value(de::Unexpected::Unsigned(value), &"an integer identifier")
                })
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<IntId, E> {
                value.parse::<i64>().map(IntId).map_err(|_| {
                    E::invalid_value(de::Unexpected::Str(value), &"a decimal string")
                })
            }
        }

        deserializer.deserialize_any(IntIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_from_number() {
        let id: IntId = serde_json::from_str("1234").unwrap();
        assert_eq!(id.value(), 1234);
    }

    #[test]
    fn decodes_from_string() {
        let id: IntId = serde_json::from_str("\"1234\"").unwrap();
        assert_eq!(id.value(), 1234);
    }

    #[test]
    fn number_and_string_forms_agree() {
        for n in [0i64, 1, 42, 987_654_321] {
            let from_number: IntId = serde_json::from_str(&n.to_string()).unwrap();
            let from_string: IntId = serde_json::from_str(&format!("\"{n}\"")).unwrap();
            assert_eq!(from_number, from_string);
        }
    }

    #[test]
    fn rejects_non_numeric_string() {
        assert!(serde_json::from_str::<IntId>("\"abc\"").is_err());
    }

    #[test]
    fn rejects_other_json_types() {
        assert!(serde_json::from_str::<IntId>("true").is_err());
        assert!(serde_json::from_str::<IntId>("[1]").is_err());
    }
}
