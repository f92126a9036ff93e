use serde::{Deserialize, Serialize};
use serde_json::Value;

use kvr_types::KeyPage;

use crate::error::{ProtocolError, ProtocolResult};

/// A tool invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The result of a tool invocation: one text payload and an explicit error
/// flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Pretty-printed JSON payload.
    pub fn json<T: Serialize>(value: &T) -> ProtocolResult<Self> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        Ok(Self::text(text))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            is_error: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListKeysResponse {
    pub keys: Vec<String>,
    pub count: usize,
    pub complete: bool,
    pub cursor: Option<String>,
}

impl From<KeyPage> for ListKeysResponse {
    fn from(page: KeyPage) -> Self {
        Self {
            count: page.keys.len(),
            keys: page.keys,
            complete: page.complete,
            cursor: page.cursor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountKeysResponse {
    pub count: usize,
    pub prefix: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub key: String,
    /// Whether the key existed before the delete.
    pub deleted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEmailResponse {
    pub success: bool,
    pub metadata_key: String,
    pub body_key: String,
}
