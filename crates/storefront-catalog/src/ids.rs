//! Newtype IDs for type-safe identifiers.
//!
//! Backend-assigned identifiers are opaque strings; the newtypes keep a
//! `VariantId` from being passed where a `ProductId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// An opaque identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new unique ID.
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);

/// Generate a unique ID from the clock and a process-wide counter.
///
/// Only the in-memory stores mint ids; a real backend assigns its own.
fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

    format!("{:x}-{:x}", timestamp, counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation_is_unique() {
        let a = VariantId::generate();
        let b = VariantId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("prod-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"prod-7\"");
        let back: ProductId = serde_json::from_str("\"prod-7\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str() {
        let id: CategoryId = "cat-1".into();
        assert_eq!(id.to_string(), "cat-1");
    }
}
