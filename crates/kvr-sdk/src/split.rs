//! Two-part writes: metadata into the owning namespace, body into the shared
//! bodies namespace.
//!
//! The two puts are not atomic. Metadata is written first; if the body write
//! then fails the metadata is left in place referencing a body key that does
//! not exist, the call fails with [`SdkError::BodyWriteFailed`], and a warning
//! is logged so the dangling reference can be reconciled later.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use kvr_registry::{EntityRouter, NamespaceRegistry};
use kvr_types::Metadata;

use crate::error::{SdkError, SdkResult};

/// UUID namespace for content-derived body keys.
const BODY_KEY_NAMESPACE: Uuid = Uuid::from_u128(0x6b76_7232_0e6d_4a1c_9f3b_62bd_0d1e_5a77);

/// A split-entity write request.
#[derive(Clone, Debug)]
pub struct SplitWrite {
    pub classification_key: String,
    pub metadata_key: String,
    pub metadata_value: String,
    /// Key for the body; derived from the body content when `None`.
    pub body_key: Option<String>,
    pub body_value: String,
}

impl SplitWrite {
    pub fn new(
        classification_key: impl Into<String>,
        metadata_key: impl Into<String>,
        metadata_value: impl Into<String>,
        body_value: impl Into<String>,
    ) -> Self {
        Self {
            classification_key: classification_key.into(),
            metadata_key: metadata_key.into(),
            metadata_value: metadata_value.into(),
            body_key: None,
            body_value: body_value.into(),
        }
    }

    pub fn with_body_key(mut self, body_key: impl Into<String>) -> Self {
        self.body_key = Some(body_key.into());
        self
    }

    /// The caller's body key, or one derived from the body.
    pub fn effective_body_key(&self) -> String {
        self.body_key
            .clone()
            .unwrap_or_else(|| derive_body_key(&self.body_value))
    }
}

/// Where the two halves of a split write landed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitReceipt {
    pub metadata_key: String,
    pub body_key: String,
    /// Name of the namespace holding the metadata.
    pub namespace: String,
}

/// Content-derived body key: a UUID v5 over the body bytes.
///
/// ```
/// let a = kvr_sdk::derive_body_key("Dear Sir or Madam");
/// assert_eq!(a, kvr_sdk::derive_body_key("Dear Sir or Madam"));
/// assert_ne!(a, kvr_sdk::derive_body_key("Dear Madam"));
/// ```
pub fn derive_body_key(body: &str) -> String {
    Uuid::new_v5(&BODY_KEY_NAMESPACE, body.as_bytes()).to_string()
}

fn side_metadata(fields: serde_json::Value) -> Metadata {
    match fields {
        serde_json::Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

/// Route, then write metadata and body.
///
/// Both namespaces are resolved before anything is written, so routing and
/// resolution failures leave the stores untouched.
pub async fn write_split(
    registry: &NamespaceRegistry,
    router: &EntityRouter,
    write: SplitWrite,
) -> SdkResult<SplitReceipt> {
    let (classification, owner) = router.route_normalized(&write.classification_key)?;
    let owner_handle = registry.resolve_namespace(owner)?;
    let bodies_handle = registry.bodies_handle()?;

    let body_key = write.effective_body_key();
    let stored_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let metadata_meta = side_metadata(json!({
        "classification": classification,
        "body_key": body_key,
        "stored_at": stored_at,
    }));
    owner_handle
        .accessor()
        .put(&write.metadata_key, &write.metadata_value, Some(metadata_meta))
        .await?;

    let body_meta = side_metadata(json!({
        "classification": classification,
        "stored_at": stored_at,
    }));
    if let Err(source) = bodies_handle
        .accessor()
        .put(&body_key, &write.body_value, Some(body_meta))
        .await
    {
        warn!(
            namespace = %owner.name,
            metadata_key = %write.metadata_key,
            body_key = %body_key,
            error = %source,
            "body write failed; metadata references a missing body"
        );
        return Err(SdkError::BodyWriteFailed {
            metadata_key: write.metadata_key,
            body_key,
            source,
        });
    }

    info!(
        namespace = %owner.name,
        metadata_key = %write.metadata_key,
        body_key = %body_key,
        "stored split entity"
    );
    Ok(SplitReceipt {
        metadata_key: write.metadata_key,
        body_key,
        namespace: owner.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use kvr_registry::{Catalog, StoreBindings};
    use kvr_store::testing::InstrumentedKvStore;
    use kvr_store::KvStore;
    use kvr_types::StoreId;

    const FOLDER: &str = "INBOX/Courts/Court of Appeal";

    struct Harness {
        registry: NamespaceRegistry,
        router: EntityRouter,
        owner: Arc<InstrumentedKvStore>,
        bodies: Arc<InstrumentedKvStore>,
    }

    fn harness() -> Harness {
        let catalog = Catalog::builtin();
        let owner = Arc::new(InstrumentedKvStore::new("court-of-appeal"));
        let bodies = Arc::new(InstrumentedKvStore::new("email-bodies"));
        let bindings = StoreBindings::in_memory(&catalog)
            .with(StoreId::new("COURT_OF_APPEAL_KV").unwrap(), owner.clone())
            .with(StoreId::new("EMAIL_BODIES_KV").unwrap(), bodies.clone());
        let router = EntityRouter::new(&catalog);
        Harness {
            registry: NamespaceRegistry::new(catalog, bindings),
            router,
            owner,
            bodies,
        }
    }

    #[tokio::test]
    async fn writes_metadata_then_body() {
        let h = harness();
        let write = SplitWrite::new(FOLDER, "msg-1", "{\"subject\":\"Listing\"}", "body text")
            .with_body_key("body-1");

        let receipt = write_split(&h.registry, &h.router, write).await.unwrap();
        assert_eq!(receipt.namespace, "court-of-appeal");
        assert_eq!(receipt.body_key, "body-1");

        let meta = h.owner.inner().get("msg-1").await.unwrap().unwrap();
        assert_eq!(meta.metadata_str("body_key"), Some("body-1"));
        assert_eq!(meta.metadata_str("classification"), Some(FOLDER));
        assert!(meta.metadata_str("stored_at").is_some());

        let body = h.bodies.inner().get("body-1").await.unwrap().unwrap();
        assert_eq!(body.value, "body text");
        assert_eq!(body.metadata_str("classification"), Some(FOLDER));
        assert_eq!(body.metadata_str("body_key"), None);
    }

    #[tokio::test]
    async fn metadata_lands_in_owner_store_not_a_namesake() {
        let catalog = Catalog::builtin();
        let owner = Arc::new(InstrumentedKvStore::new("court-of-appeal"));
        let decoy = Arc::new(InstrumentedKvStore::new("decoy"));
        let bindings = StoreBindings::in_memory(&catalog)
            .with(StoreId::new("COURT_OF_APPEAL_KV").unwrap(), owner.clone())
            .with(StoreId::new("court-of-appeal").unwrap(), decoy.clone())
            .with(StoreId::new("email-bodies").unwrap(), decoy.clone());
        let router = EntityRouter::new(&catalog);
        let registry = NamespaceRegistry::new(catalog, bindings);

        let write = SplitWrite::new(FOLDER, "msg-1", "m", "b").with_body_key("body-1");
        let receipt = write_split(&registry, &router, write).await.unwrap();

        assert_eq!(receipt.namespace, "court-of-appeal");
        assert!(owner.inner().get("msg-1").await.unwrap().is_some());
        assert_eq!(decoy.put_calls(), 0);
        assert!(registry
            .bodies_handle()
            .unwrap()
            .store
            .get("body-1")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn classification_is_stored_normalized() {
        let h = harness();
        let write = SplitWrite::new(" INBOX/Courts/Court of Appeal/ ", "msg-1", "m", "b");
        write_split(&h.registry, &h.router, write).await.unwrap();

        let meta = h.owner.inner().get("msg-1").await.unwrap().unwrap();
        assert_eq!(meta.metadata_str("classification"), Some(FOLDER));
    }

    #[tokio::test]
    async fn unmapped_folder_writes_nothing() {
        let h = harness();
        let write = SplitWrite::new("INBOX/Unsorted", "msg-1", "m", "b");

        let err = write_split(&h.registry, &h.router, write).await.unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!(h.owner.put_calls(), 0);
        assert_eq!(h.bodies.put_calls(), 0);
    }

    #[tokio::test]
    async fn body_failure_leaves_dangling_metadata() {
        let h = harness();
        h.bodies.fail_puts(true);
        let write = SplitWrite::new(FOLDER, "msg-1", "m", "b").with_body_key("body-1");

        let err = write_split(&h.registry, &h.router, write).await.unwrap_err();
        match err {
            SdkError::BodyWriteFailed {
                metadata_key,
                body_key,
                ..
            } => {
                assert_eq!(metadata_key, "msg-1");
                assert_eq!(body_key, "body-1");
            }
            other => panic!("unexpected error: {other}"),
        }

        let meta = h.owner.inner().get("msg-1").await.unwrap().unwrap();
        assert_eq!(meta.metadata_str("body_key"), Some("body-1"));
        assert!(h.bodies.inner().get("body-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn metadata_failure_skips_body() {
        let h = harness();
        h.owner.fail_puts(true);
        let write = SplitWrite::new(FOLDER, "msg-1", "m", "b");

        let err = write_split(&h.registry, &h.router, write).await.unwrap_err();
        assert!(matches!(err, SdkError::Store(_)));
        assert_eq!(h.bodies.put_calls(), 0);
    }

    #[tokio::test]
    async fn derived_body_key_is_content_addressed() {
        let h = harness();
        let first = write_split(
            &h.registry,
            &h.router,
            SplitWrite::new(FOLDER, "msg-1", "m", "same body"),
        )
        .await
        .unwrap();
        let second = write_split(
            &h.registry,
            &h.router,
            SplitWrite::new(FOLDER, "msg-2", "m", "same body"),
        )
        .await
        .unwrap();

        assert_eq!(first.body_key, second.body_key);
        assert_eq!(first.body_key, derive_body_key("same body"));
        assert_eq!(h.bodies.inner().len(), 1);
    }
}
