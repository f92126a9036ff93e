use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Every tool KVR exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListKeys,
    CountKeys,
    Get,
    Put,
    Delete,
    BulkGet,
    ListNamespaces,
    ListFolderMappings,
    FolderStats,
    StoreEmail,
    FleetHealth,
}

impl ToolName {
    pub const ALL: [ToolName; 11] = [
        ToolName::ListKeys,
        ToolName::CountKeys,
        ToolName::Get,
        ToolName::Put,
        ToolName::Delete,
        ToolName::BulkGet,
        ToolName::ListNamespaces,
        ToolName::ListFolderMappings,
        ToolName::FolderStats,
        ToolName::StoreEmail,
        ToolName::FleetHealth,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListKeys => "kv_list_keys",
            Self::CountKeys => "kv_count_keys",
            Self::Get => "kv_get",
            Self::Put => "kv_put",
            Self::Delete => "kv_delete",
            Self::BulkGet => "kv_bulk_get",
            Self::ListNamespaces => "list_namespaces",
            Self::ListFolderMappings => "list_folder_mappings",
            Self::FolderStats => "folder_stats",
            Self::StoreEmail => "store_email",
            Self::FleetHealth => "fleet_health",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ListKeys => "List one page of keys in a namespace, optionally filtered by prefix.",
            Self::CountKeys => "Count every key in a namespace matching an optional prefix.",
            Self::Get => "Read the value stored under a key.",
            Self::Put => "Create or replace a key, with optional JSON metadata.",
            Self::Delete => "Delete a key. Deleting an absent key succeeds.",
            Self::BulkGet => "Read up to 100 keys from one namespace in a single call.",
            Self::ListNamespaces => "List every namespace grouped by category.",
            Self::ListFolderMappings => "List every mail folder and the namespace that owns it.",
            Self::FolderStats => "Report the owning namespace of a mail folder and its exact key count.",
            Self::StoreEmail => {
                "Store an email as metadata in the folder's namespace and body in the shared bodies namespace."
            }
            Self::FleetHealth => {
                "Probe every non-system namespace with a single-key listing. -1 means more than one key."
            }
        }
    }

    pub fn input_schema(&self) -> Value {
        let namespace = json!({
            "type": "string",
            "description": "Namespace name (e.g. court-of-appeal) or raw store id"
        });
        let key = json!({ "type": "string", "minLength": 1 });

        match self {
            Self::ListKeys => json!({
                "type": "object",
                "properties": {
                    "namespace": namespace,
                    "prefix": { "type": "string" },
                    "limit": { "type": "integer", "minimum": 1, "maximum": 1000, "default": 1000 },
                    "cursor": { "type": "string", "description": "Cursor from a previous page" }
                },
                "required": ["namespace"],
                "additionalProperties": false
            }),
            Self::CountKeys => json!({
                "type": "object",
                "properties": {
                    "namespace": namespace,
                    "prefix": { "type": "string" }
                },
                "required": ["namespace"],
                "additionalProperties": false
            }),
            Self::Get | Self::Delete => json!({
                "type": "object",
                "properties": { "namespace": namespace, "key": key },
                "required": ["namespace", "key"],
                "additionalProperties": false
            }),
            Self::Put => json!({
                "type": "object",
                "properties": {
                    "namespace": namespace,
                    "key": key,
                    "value": { "type": "string" },
                    "metadata": { "type": "object" }
                },
                "required": ["namespace", "key", "value"],
                "additionalProperties": false
            }),
            Self::BulkGet => json!({
                "type": "object",
                "properties": {
                    "namespace": namespace,
                    "keys": {
                        "type": "array",
                        "items": key,
                        "minItems": 1,
                        "maxItems": crate::args::MAX_BULK_KEYS
                    }
                },
                "required": ["namespace", "keys"],
                "additionalProperties": false
            }),
            Self::ListNamespaces | Self::ListFolderMappings | Self::FleetHealth => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            Self::FolderStats => json!({
                "type": "object",
                "properties": {
                    "folder": { "type": "string", "description": "Mail folder path, e.g. INBOX/Courts/High Court" }
                },
                "required": ["folder"],
                "additionalProperties": false
            }),
            Self::StoreEmail => json!({
                "type": "object",
                "properties": {
                    "folder": { "type": "string" },
                    "metadata_key": key.clone(),
                    "metadata_value": { "type": "string" },
                    "body_key": {
                        "type": "string",
                        "minLength": 1,
                        "description": "Defaults to a key derived from the body"
                    },
                    "body_value": { "type": "string" }
                },
                "required": ["folder", "metadata_key", "metadata_value", "body_value"],
                "additionalProperties": false
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool as advertised to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// The full tool catalogue.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(ToolName::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolName::parse("kv_scan"), None);
        assert_eq!(ToolName::parse("KV_GET"), None);
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = ToolName::ALL.iter().map(ToolName::as_str).collect();
        assert_eq!(names.len(), ToolName::ALL.len());
    }

    #[test]
    fn every_schema_is_a_closed_object() {
        for def in tool_definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert_eq!(def.input_schema["additionalProperties"], false, "{}", def.name);
        }
    }

    #[test]
    fn bulk_get_schema_caps_keys() {
        let schema = ToolName::BulkGet.input_schema();
        assert_eq!(schema["properties"]["keys"]["maxItems"], 100);
    }
}
