use serde::{Deserialize, Serialize};

/// Structured side metadata attached to an entry.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A stored value together with its optional metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Entry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(value: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            value: value.into(),
            metadata: Some(metadata),
        }
    }

    /// Look up a string field in the metadata.
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(field)?.as_str()
    }
}
