//! Editor session identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single editor session, attached to every log entry it emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new session ID.
    pub fn generate() -> Self {
        let high: u32 = rand::random();
        let low: u32 = rand::random();
        Self(format!("sess-{:08x}{:08x}", high, low))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("sess-"));
    }

    #[test]
    fn test_from_string() {
        let id = SessionId::from_string("sess-fixed");
        assert_eq!(id.to_string(), "sess-fixed");
    }
}
