use tracing::{debug, warn};

use kvr_protocol::{
    tool_definitions, CountKeysResponse, DeleteResponse, ListKeysResponse, ProtocolError,
    ProtocolResult, PutResponse, StoreEmailResponse, ToolCall, ToolDefinition, ToolOutput,
    ToolRequest,
};
use kvr_sdk::{Fleet, SdkError, SplitWrite};

enum Failure {
    /// The tool ran and failed; reported to the caller as an error output.
    Tool(SdkError),
    Protocol(ProtocolError),
}

impl From<SdkError> for Failure {
    fn from(e: SdkError) -> Self {
        Self::Tool(e)
    }
}

impl From<ProtocolError> for Failure {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

/// Routes validated tool calls to the fleet.
#[derive(Clone, Debug)]
pub struct ToolDispatcher {
    fleet: Fleet,
    health_excluded: Vec<String>,
}

impl ToolDispatcher {
    pub fn new(fleet: Fleet) -> Self {
        Self {
            fleet,
            health_excluded: Vec::new(),
        }
    }

    /// Extra namespaces skipped by `fleet_health`.
    pub fn with_health_excluded(mut self, excluded: Vec<String>) -> Self {
        self.health_excluded = excluded;
        self
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Run one tool call.
    ///
    /// Unknown tools and invalid arguments are `Err`. Everything that happens
    /// once the tool runs, failures included, is an `Ok` output whose
    /// `is_error` flag tells the two apart.
    pub async fn call(&self, call: &ToolCall) -> ProtocolResult<ToolOutput> {
        let request = ToolRequest::parse(call)?;
        let tool = request.tool();
        debug!(tool = %tool, "dispatching tool call");

        match self.execute(request).await {
            Ok(output) => Ok(output),
            Err(Failure::Tool(e)) => {
                if e.is_caller_error() {
                    debug!(tool = %tool, error = %e, "tool rejected input");
                } else {
                    warn!(tool = %tool, error = %e, "tool failed");
                }
                Ok(ToolOutput::error(e.to_string()))
            }
            Err(Failure::Protocol(e)) => Err(e),
        }
    }

    async fn execute(&self, request: ToolRequest) -> Result<ToolOutput, Failure> {
        let fleet = &self.fleet;
        let output = match request {
            ToolRequest::ListKeys(a) => {
                let page = fleet
                    .list_keys(
                        &a.namespace,
                        a.prefix.as_deref(),
                        a.cursor.as_deref(),
                        a.limit,
                    )
                    .await?;
                ToolOutput::json(&ListKeysResponse::from(page))?
            }
            ToolRequest::CountKeys(a) => {
                let count = fleet.count_keys(&a.namespace, a.prefix.as_deref()).await?;
                ToolOutput::json(&CountKeysResponse {
                    count,
                    prefix: a.prefix,
                })?
            }
            ToolRequest::Get(a) => match fleet.get(&a.namespace, &a.key).await? {
                Some(value) => ToolOutput::text(value),
                None => ToolOutput::error(format!("Key not found: {}", a.key)),
            },
            ToolRequest::Put(a) => {
                fleet.put(&a.namespace, &a.key, &a.value, a.metadata).await?;
                ToolOutput::json(&PutResponse {
                    success: true,
                    key: a.key,
                })?
            }
            ToolRequest::Delete(a) => {
                let deleted = fleet.delete(&a.namespace, &a.key).await?;
                ToolOutput::json(&DeleteResponse {
                    success: true,
                    key: a.key,
                    deleted,
                })?
            }
            ToolRequest::BulkGet(a) => {
                let values = fleet.bulk_get(&a.namespace, &a.keys).await?;
                ToolOutput::json(&values)?
            }
            ToolRequest::ListNamespaces => ToolOutput::json(&fleet.namespace_overview())?,
            ToolRequest::ListFolderMappings => ToolOutput::json(&fleet.folder_mappings())?,
            ToolRequest::FolderStats(a) => ToolOutput::json(&fleet.folder_stats(&a.folder).await?)?,
            ToolRequest::StoreEmail(a) => {
                let write = SplitWrite {
                    classification_key: a.folder,
                    metadata_key: a.metadata_key,
                    metadata_value: a.metadata_value,
                    body_key: a.body_key,
                    body_value: a.body_value,
                };
                let receipt = fleet.store_split(write).await?;
                ToolOutput::json(&StoreEmailResponse {
                    success: true,
                    metadata_key: receipt.metadata_key,
                    body_key: receipt.body_key,
                })?
            }
            ToolRequest::FleetHealth => {
                ToolOutput::json(&fleet.health(&self.health_excluded).await)?
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvr_registry::Catalog;
    use serde_json::{json, Value};

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(Fleet::in_memory(Catalog::builtin()))
    }

    async fn call(d: &ToolDispatcher, name: &str, args: Value) -> ToolOutput {
        d.call(&ToolCall::new(name, args)).await.unwrap()
    }

    fn parsed(out: &ToolOutput) -> Value {
        assert!(!out.is_error, "unexpected error output: {}", out.text);
        serde_json::from_str(&out.text).unwrap()
    }

    #[tokio::test]
    async fn put_get_delete() {
        let d = dispatcher();
        let put = call(&d, "kv_put", json!({ "namespace": "hmcts", "key": "k", "value": "v" })).await;
        assert_eq!(parsed(&put), json!({ "success": true, "key": "k" }));

        let get = call(&d, "kv_get", json!({ "namespace": "hmcts", "key": "k" })).await;
        assert_eq!(get, ToolOutput::text("v"));

        let del = call(&d, "kv_delete", json!({ "namespace": "hmcts", "key": "k" })).await;
        assert_eq!(parsed(&del)["deleted"], true);

        let missing = call(&d, "kv_get", json!({ "namespace": "hmcts", "key": "k" })).await;
        assert!(missing.is_error);
        assert_eq!(missing.text, "Key not found: k");
    }

    #[tokio::test]
    async fn list_and_count() {
        let d = dispatcher();
        for key in ["case-1", "case-2", "note-1"] {
            call(&d, "kv_put", json!({ "namespace": "dwp", "key": key, "value": "v" })).await;
        }

        let page = call(
            &d,
            "kv_list_keys",
            json!({ "namespace": "dwp", "prefix": "case-", "limit": 1 }),
        )
        .await;
        let page = parsed(&page);
        assert_eq!(page["keys"], json!(["case-1"]));
        assert_eq!(page["complete"], false);

        let next = call(
            &d,
            "kv_list_keys",
            json!({ "namespace": "dwp", "prefix": "case-", "cursor": page["cursor"] }),
        )
        .await;
        assert_eq!(parsed(&next)["keys"], json!(["case-2"]));

        let count = call(&d, "kv_count_keys", json!({ "namespace": "dwp" })).await;
        assert_eq!(parsed(&count), json!({ "count": 3, "prefix": null }));
    }

    #[tokio::test]
    async fn unknown_namespace_is_error_output() {
        let d = dispatcher();
        let out = call(&d, "kv_get", json!({ "namespace": "nowhere", "key": "k" })).await;
        assert!(out.is_error);
        assert!(out.text.contains("court-of-appeal"));
    }

    #[tokio::test]
    async fn invalid_arguments_are_protocol_errors() {
        let d = dispatcher();
        let err = d
            .call(&ToolCall::new("kv_get", json!({ "namespace": "hmcts" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidArguments { .. }));

        let err = d.call(&ToolCall::new("kv_scan", json!({}))).await.unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn bulk_get_reports_absent_keys_as_null() {
        let d = dispatcher();
        call(&d, "kv_put", json!({ "namespace": "ombudsman", "key": "a", "value": "1" })).await;
        let out = call(
            &d,
            "kv_bulk_get",
            json!({ "namespace": "ombudsman", "keys": ["a", "b"] }),
        )
        .await;
        assert_eq!(parsed(&out), json!({ "a": "1", "b": null }));
    }

    #[tokio::test]
    async fn store_email_and_folder_stats() {
        let d = dispatcher();
        let out = call(
            &d,
            "store_email",
            json!({
                "folder": "INBOX/Courts/High Court",
                "metadata_key": "msg-1",
                "metadata_value": "{\"subject\":\"Hearing\"}",
                "body_key": "body-1",
                "body_value": "Dear all"
            }),
        )
        .await;
        assert_eq!(
            parsed(&out),
            json!({ "success": true, "metadata_key": "msg-1", "body_key": "body-1" })
        );

        let stats = call(&d, "folder_stats", json!({ "folder": "INBOX/Courts/High Court" })).await;
        let stats = parsed(&stats);
        assert_eq!(stats["human_name"], "high-court");
        assert_eq!(stats["store_id"], "HIGH_COURT_KV");
        assert_eq!(stats["entry_count"], 1);

        let body = call(&d, "kv_get", json!({ "namespace": "email-bodies", "key": "body-1" })).await;
        assert_eq!(body.text, "Dear all");
    }

    #[tokio::test]
    async fn unmapped_folder_is_error_output() {
        let d = dispatcher();
        let out = call(&d, "folder_stats", json!({ "folder": "INBOX/Spam" })).await;
        assert!(out.is_error);
    }

    #[tokio::test]
    async fn discovery_tools() {
        let d = dispatcher();
        let namespaces = parsed(&call(&d, "list_namespaces", json!({})).await);
        assert_eq!(namespaces["total"], d.fleet().registry().catalog().len());

        let mappings = parsed(&call(&d, "list_folder_mappings", Value::Null).await);
        assert_eq!(
            mappings.as_array().unwrap().len(),
            d.fleet().router().len()
        );
    }

    #[tokio::test]
    async fn fleet_health_honours_exclusions() {
        let d = dispatcher().with_health_excluded(vec!["dwp".into()]);
        let report = parsed(&call(&d, "fleet_health", json!({})).await);
        assert_eq!(report["status"], "ok");
        assert!(report["counts"].get("dwp").is_none());
        assert!(report["counts"].get("email-bodies").is_none());
        assert_eq!(report["counts"]["hmcts"], 0);
    }
}
