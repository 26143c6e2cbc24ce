//! Domain identifier types with proper encapsulation.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Order identifier - the sole key for lookup and upsert.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors. Serialized as a bare JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderUid(String);

impl OrderUid {
    /// Create a new `OrderUid` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the order ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderUid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OrderUid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for OrderUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `OrderUid` be queried with a plain `&str`.
impl Borrow<str> for OrderUid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_detection_trims_whitespace() {
        assert!(OrderUid::new("").is_blank());
        assert!(OrderUid::new("   ").is_blank());
        assert!(!OrderUid::new("b563feb7b2b84b6test").is_blank());
    }

    #[test]
    fn serializes_as_plain_string() {
        let uid = OrderUid::from("abc");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"abc\"");
        let back: OrderUid = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, uid);
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(OrderUid::from("a1"), 1);
        assert_eq!(map.get("a1"), Some(&1));
    }
}
