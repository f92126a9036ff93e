use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque handle used to reach the underlying store of one namespace.
///
/// The registry never interprets the contents; it is whatever the binding
/// layer was configured with (a binding name, a remote namespace id, ...).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    /// Create a store id, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TypeError::EmptyStoreId);
        }
        Ok(Self(id))
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreId({})", self.0)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StoreId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Grouping of a namespace. The set is closed.
///
/// Serialized lowercase; parsed case-insensitively, from text and from serde.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    /// Reserved namespaces (configuration, shared bodies, audit).
    System,
    Courts,
    Claimants,
    Government,
    Complaints,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::System,
        Category::Courts,
        Category::Claimants,
        Category::Government,
        Category::Complaints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Courts => "courts",
            Self::Claimants => "claimants",
            Self::Government => "government",
            Self::Complaints => "complaints",
        }
    }

    /// Returns `true` for reserved namespaces that fleet scans skip by default.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| TypeError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One registered key-value namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Stable, user-facing name (unique across the registry).
    pub name: String,
    /// Handle of the backing store (unique across the registry).
    pub store_id: StoreId,
    pub category: Category,
}

impl Namespace {
    pub fn new(name: impl Into<String>, store_id: StoreId, category: Category) -> Self {
        Self {
            name: name.into(),
            store_id,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_id_rejects_blank() {
        assert_eq!(StoreId::new("").unwrap_err(), TypeError::EmptyStoreId);
        assert_eq!(StoreId::new("   ").unwrap_err(), TypeError::EmptyStoreId);
        assert_eq!(StoreId::new("COURTS_KV").unwrap().as_str(), "COURTS_KV");
    }

    #[test]
    fn store_id_serializes_as_plain_string() {
        let id = StoreId::new("BODIES_KV").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"BODIES_KV\"");
        assert_eq!(format!("{id:?}"), "StoreId(BODIES_KV)");
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("Courts".parse::<Category>().unwrap(), Category::Courts);
        assert_eq!(" complaints ".parse::<Category>().unwrap(), Category::Complaints);
        assert!(matches!(
            "tribunals".parse::<Category>(),
            Err(TypeError::UnknownCategory(_))
        ));
    }

    #[test]
    fn category_deserializes_case_insensitively() {
        let c: Category = serde_json::from_str("\"Courts\"").unwrap();
        assert_eq!(c, Category::Courts);
        assert!(serde_json::from_str::<Category>("\"tribunals\"").is_err());
    }

    #[test]
    fn category_display_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn only_system_is_reserved() {
        let reserved: Vec<_> = Category::ALL.into_iter().filter(Category::is_reserved).collect();
        assert_eq!(reserved, vec![Category::System]);
    }
}
