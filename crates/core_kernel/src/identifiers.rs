//! Strongly-typed identifiers for CRM records
//!
//! A pet record carries two identifiers that must never be mixed up: the
//! external identifier chosen by whoever submits the record, and the internal
//! identifier the CRM assigns on creation. Both are opaque strings, so newtype
//! wrappers are used to keep them apart at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses an identifier, rejecting blank input
            ///
            /// The value is kept exactly as given; padding is part of the key.
            pub fn parse(value: impl AsRef<str>) -> Result<Self, CoreError> {
                let value = value.as_ref();
                if value.trim().is_empty() {
                    return Err(CoreError::validation(concat!($label, " must not be blank")));
                }
                Ok(Self(value.to_string()))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns a human-readable label for this identifier kind
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Caller-supplied key, stored in the CRM's `id` property
define_id!(ExternalId, "external id");

// CRM-assigned object id (`hs_object_id`)
define_id!(InternalId, "internal id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_padding() {
        let id = ExternalId::parse("  p1 ").unwrap();
        assert_eq!(id.as_str(), "  p1 ");
        assert_ne!(id, ExternalId::parse("p1").unwrap());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(ExternalId::parse("").is_err());
        assert!(InternalId::parse("   ").is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let id: InternalId = "90210".parse().unwrap();
        assert_eq!(id.to_string(), "90210");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ExternalId::parse("p1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");

        let back: ExternalId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExternalId::label(), "external id");
        assert_eq!(InternalId::label(), "internal id");
    }
}
