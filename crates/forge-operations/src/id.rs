//! The correlation handle for units of work.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier naming a unit of work executing in the build engine.
///
/// Identifiers are minted by the engine and treated as opaque everywhere
/// else; consumers only clone, compare, and display them. A diagnostic
/// correlated with an identifier can later be attributed to the operation
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationIdentifier(String);

impl OperationIdentifier {
    /// Create an identifier from its engine-assigned name.
    pub fn new(id: impl Into<String>) -> Self {
        OperationIdentifier(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationIdentifier {
    fn from(id: &str) -> Self {
        OperationIdentifier(id.to_owned())
    }
}

impl From<String> for OperationIdentifier {
    fn from(id: String) -> Self {
        OperationIdentifier(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let a = OperationIdentifier::new("op-1");
        let b = OperationIdentifier::new("op-1");
        let c = OperationIdentifier::new("op-2");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_identifier_display() {
        let id = OperationIdentifier::new("task:compile");
        assert_eq!(id.to_string(), "task:compile");
        assert_eq!(id.as_str(), "task:compile");
    }

    #[test]
    fn test_identifier_serializes_as_string() {
        let id = OperationIdentifier::new("op-7");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("op-7"));
    }

    #[test]
    fn test_identifier_from_conversions() {
        let from_str: OperationIdentifier = "op-1".into();
        let from_string: OperationIdentifier = String::from("op-1").into();
        assert_eq!(from_str, from_string);
    }
}
