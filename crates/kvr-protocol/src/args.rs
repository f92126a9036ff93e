//! Typed tool arguments.
//!
//! Arguments are decoded with unknown fields rejected, then validated, before
//! any tool runs. A failure at either step is
//! [`ProtocolError::InvalidArguments`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use kvr_types::{Metadata, MAX_LIST_LIMIT};

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::ToolCall;
use crate::tool::ToolName;

/// Largest `keys` list accepted by `kv_bulk_get`.
pub const MAX_BULK_KEYS: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListKeysArgs {
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountKeysArgs {
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Arguments naming one key, shared by `kv_get` and `kv_delete`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyArgs {
    pub namespace: String,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PutArgs {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkGetArgs {
    pub namespace: String,
    pub keys: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderStatsArgs {
    pub folder: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreEmailArgs {
    pub folder: String,
    pub metadata_key: String,
    pub metadata_value: String,
    #[serde(default)]
    pub body_key: Option<String>,
    pub body_value: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

/// A decoded, validated tool invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolRequest {
    ListKeys(ListKeysArgs),
    CountKeys(CountKeysArgs),
    Get(KeyArgs),
    Put(PutArgs),
    Delete(KeyArgs),
    BulkGet(BulkGetArgs),
    ListNamespaces,
    ListFolderMappings,
    FolderStats(FolderStatsArgs),
    StoreEmail(StoreEmailArgs),
    FleetHealth,
}

impl ToolRequest {
    /// Decode and validate a call.
    pub fn parse(call: &ToolCall) -> ProtocolResult<Self> {
        let tool =
            ToolName::parse(&call.name).ok_or_else(|| ProtocolError::UnknownTool(call.name.clone()))?;
        let args = call.arguments.clone();

        let request = match tool {
            ToolName::ListKeys => Self::ListKeys(decode(tool, args)?),
            ToolName::CountKeys => Self::CountKeys(decode(tool, args)?),
            ToolName::Get => Self::Get(decode(tool, args)?),
            ToolName::Put => Self::Put(decode(tool, args)?),
            ToolName::Delete => Self::Delete(decode(tool, args)?),
            ToolName::BulkGet => Self::BulkGet(decode(tool, args)?),
            ToolName::ListNamespaces => {
                decode::<NoArgs>(tool, args)?;
                Self::ListNamespaces
            }
            ToolName::ListFolderMappings => {
                decode::<NoArgs>(tool, args)?;
                Self::ListFolderMappings
            }
            ToolName::FolderStats => Self::FolderStats(decode(tool, args)?),
            ToolName::StoreEmail => Self::StoreEmail(decode(tool, args)?),
            ToolName::FleetHealth => {
                decode::<NoArgs>(tool, args)?;
                Self::FleetHealth
            }
        };
        request.validate()?;
        Ok(request)
    }

    pub fn tool(&self) -> ToolName {
        match self {
            Self::ListKeys(_) => ToolName::ListKeys,
            Self::CountKeys(_) => ToolName::CountKeys,
            Self::Get(_) => ToolName::Get,
            Self::Put(_) => ToolName::Put,
            Self::Delete(_) => ToolName::Delete,
            Self::BulkGet(_) => ToolName::BulkGet,
            Self::ListNamespaces => ToolName::ListNamespaces,
            Self::ListFolderMappings => ToolName::ListFolderMappings,
            Self::FolderStats(_) => ToolName::FolderStats,
            Self::StoreEmail(_) => ToolName::StoreEmail,
            Self::FleetHealth => ToolName::FleetHealth,
        }
    }

    fn validate(&self) -> ProtocolResult<()> {
        let tool = self.tool();
        match self {
            Self::ListKeys(a) => {
                required(tool, "namespace", &a.namespace)?;
                if let Some(limit) = a.limit {
                    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
                        return Err(ProtocolError::invalid(
                            tool.as_str(),
                            format!("limit must be between 1 and {MAX_LIST_LIMIT}, got {limit}"),
                        ));
                    }
                }
                Ok(())
            }
            Self::CountKeys(a) => required(tool, "namespace", &a.namespace),
            Self::Get(a) | Self::Delete(a) => {
                required(tool, "namespace", &a.namespace)?;
                required(tool, "key", &a.key)
            }
            Self::Put(a) => {
                required(tool, "namespace", &a.namespace)?;
                required(tool, "key", &a.key)
            }
            Self::BulkGet(a) => {
                required(tool, "namespace", &a.namespace)?;
                if a.keys.is_empty() {
                    return Err(ProtocolError::invalid(tool.as_str(), "keys must not be empty"));
                }
                if a.keys.len() > MAX_BULK_KEYS {
                    return Err(ProtocolError::invalid(
                        tool.as_str(),
                        format!("at most {MAX_BULK_KEYS} keys per call, got {}", a.keys.len()),
                    ));
                }
                a.keys.iter().try_for_each(|k| required(tool, "keys[]", k))
            }
            Self::FolderStats(a) => required(tool, "folder", &a.folder),
            Self::StoreEmail(a) => {
                required(tool, "folder", &a.folder)?;
                required(tool, "metadata_key", &a.metadata_key)?;
                match &a.body_key {
                    Some(body_key) => required(tool, "body_key", body_key),
                    None => Ok(()),
                }
            }
            Self::ListNamespaces | Self::ListFolderMappings | Self::FleetHealth => Ok(()),
        }
    }
}

fn required(tool: ToolName, field: &str, value: &str) -> ProtocolResult<()> {
    if value.trim().is_empty() {
        return Err(ProtocolError::invalid(
            tool.as_str(),
            format!("{field} must be a non-empty string"),
        ));
    }
    Ok(())
}

/// Decode a JSON payload into typed arguments. A missing payload is an empty
/// object.
fn decode<T: DeserializeOwned>(tool: ToolName, payload: Value) -> ProtocolResult<T> {
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(payload).map_err(|err| ProtocolError::invalid(tool.as_str(), err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, arguments: Value) -> ProtocolResult<ToolRequest> {
        ToolRequest::parse(&ToolCall::new(name, arguments))
    }

    fn assert_invalid(result: ProtocolResult<ToolRequest>) {
        assert!(
            matches!(result, Err(ProtocolError::InvalidArguments { .. })),
            "expected invalid arguments, got {result:?}"
        );
    }

    #[test]
    fn list_keys_with_optional_fields() {
        let req = parse(
            "kv_list_keys",
            json!({ "namespace": "hmcts", "prefix": "case-", "limit": 10 }),
        )
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::ListKeys(ListKeysArgs {
                namespace: "hmcts".into(),
                prefix: Some("case-".into()),
                limit: Some(10),
                cursor: None,
            })
        );
    }

    #[test]
    fn list_keys_limit_bounds() {
        assert_invalid(parse("kv_list_keys", json!({ "namespace": "a", "limit": 0 })));
        assert_invalid(parse("kv_list_keys", json!({ "namespace": "a", "limit": 1001 })));
        assert_invalid(parse("kv_list_keys", json!({ "namespace": "a", "limit": -3 })));
        assert!(parse("kv_list_keys", json!({ "namespace": "a", "limit": 1000 })).is_ok());
    }

    #[test]
    fn unknown_tool() {
        let err = parse("kv_scan", json!({})).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTool(ref n) if n == "kv_scan"));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert_invalid(parse("kv_get", json!({ "namespace": "a", "key": "k", "extra": 1 })));
        assert_invalid(parse("fleet_health", json!({ "verbose": true })));
    }

    #[test]
    fn missing_and_blank_fields_rejected() {
        assert_invalid(parse("kv_get", json!({ "namespace": "a" })));
        assert_invalid(parse("kv_get", json!({ "namespace": " ", "key": "k" })));
        assert_invalid(parse("kv_put", json!({ "namespace": "a", "key": "k" })));
        assert_invalid(parse("folder_stats", json!({ "folder": "" })));
    }

    #[test]
    fn put_accepts_empty_value_and_metadata_object() {
        let req = parse(
            "kv_put",
            json!({ "namespace": "a", "key": "k", "value": "", "metadata": { "tag": "x" } }),
        )
        .unwrap();
        match req {
            ToolRequest::Put(args) => {
                assert_eq!(args.value, "");
                assert_eq!(args.metadata.unwrap()["tag"], "x");
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert_invalid(parse(
            "kv_put",
            json!({ "namespace": "a", "key": "k", "value": "v", "metadata": "flat" }),
        ));
    }

    #[test]
    fn bulk_get_key_count() {
        let keys: Vec<String> = (0..=MAX_BULK_KEYS).map(|i| format!("k{i}")).collect();
        assert_invalid(parse("kv_bulk_get", json!({ "namespace": "a", "keys": keys })));
        assert_invalid(parse("kv_bulk_get", json!({ "namespace": "a", "keys": [] })));
        assert!(parse("kv_bulk_get", json!({ "namespace": "a", "keys": &keys[..MAX_BULK_KEYS] })).is_ok());
    }

    #[test]
    fn no_argument_tools_accept_null_or_empty() {
        assert_eq!(parse("list_namespaces", Value::Null).unwrap(), ToolRequest::ListNamespaces);
        assert_eq!(parse("fleet_health", json!({})).unwrap(), ToolRequest::FleetHealth);
    }

    #[test]
    fn store_email_body_key_optional() {
        let base = json!({
            "folder": "INBOX/Government/DWP",
            "metadata_key": "msg-1",
            "metadata_value": "{}",
            "body_value": "hello"
        });
        assert!(parse("store_email", base.clone()).is_ok());

        let mut blank = base;
        blank["body_key"] = json!("");
        assert_invalid(parse("store_email", blank));
    }
}
