//! Content identifiers and hashes.
//!
//! Entities across the three CPE documents never hold references to each
//! other; they hold identifier strings and resolve them by lookup through
//! the owning snapshot. `ContentIdentifier` is the richer, namespaced form
//! used for alternate identifiers, product references, and the generic
//! `OtherID` payloads on timed events.

use url::Url;

/// Well-known identifier namespaces.
pub mod namespace {
    /// Namespace carried by an `OtherID` that denotes an AppData record
    /// (a location or product item) rather than a person.
    pub const APP_DATA: &str = "AppDataID";
}

/// A namespaced identifier, optionally carrying a resolvable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIdentifier {
    /// Identifier namespace (e.g. `"AppDataID"`, a talent API namespace).
    pub namespace: String,
    /// The identifier value within its namespace.
    pub identifier: String,
    /// Optional location where the identified content can be fetched.
    pub location: Option<Url>,
}

impl ContentIdentifier {
    /// Create an identifier with no location.
    pub fn new(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            location: None,
        }
    }

    /// Whether this identifier lives in the AppData namespace.
    #[inline]
    pub fn is_app_data(&self) -> bool {
        self.namespace == namespace::APP_DATA
    }
}

impl std::fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.identifier)
    }
}

/// A content hash: method name plus encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hash {
    /// Hash method (e.g. `"MD5"`, `"SHA-1"`).
    pub method: String,
    /// Encoded hash value.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_data_namespace() {
        let id = ContentIdentifier::new(namespace::APP_DATA, "APP_1");
        assert!(id.is_app_data());

        let other = ContentIdentifier::new("baseline.api", "12345");
        assert!(!other.is_app_data());
    }

    #[test]
    fn test_display() {
        let id = ContentIdentifier::new("AppDataID", "APP_1");
        assert_eq!(format!("{}", id), "AppDataID:APP_1");
    }
}
