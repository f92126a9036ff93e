use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use kvr_registry::{Catalog, EntityRouter, NamespaceRegistry, StoreBindings};
use kvr_store::{BulkValue, StoreAccessor, MAX_BULK_KEYS};
use kvr_types::{Category, ClassificationMapping, Entry, KeyPage, Metadata, StoreId};

use crate::error::SdkResult;
use crate::health::{self, HealthReport};
use crate::split::{self, SplitReceipt, SplitWrite};

/// Namespaces grouped for discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceOverview {
    pub total: usize,
    pub categories: BTreeMap<Category, Vec<String>>,
}

/// Exact size of the namespace that owns a classification key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    pub classification_key: String,
    pub human_name: String,
    pub store_id: StoreId,
    pub entry_count: usize,
}

/// High-level KVR API.
///
/// Cheap to clone; the registry and router are shared.
#[derive(Clone, Debug)]
pub struct Fleet {
    registry: Arc<NamespaceRegistry>,
    router: Arc<EntityRouter>,
    max_bulk_keys: usize,
}

impl Fleet {
    pub fn new(registry: NamespaceRegistry) -> Self {
        let router = EntityRouter::new(registry.catalog());
        Self {
            registry: Arc::new(registry),
            router: Arc::new(router),
            max_bulk_keys: MAX_BULK_KEYS,
        }
    }

    /// A fleet over `catalog` with an empty in-memory store per namespace.
    pub fn in_memory(catalog: Catalog) -> Self {
        let bindings = StoreBindings::in_memory(&catalog);
        Self::new(NamespaceRegistry::new(catalog, bindings))
    }

    /// Override the bulk-read batch cap.
    pub fn with_max_bulk_keys(mut self, max: usize) -> Self {
        self.max_bulk_keys = max;
        self
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn router(&self) -> &EntityRouter {
        &self.router
    }

    pub fn max_bulk_keys(&self) -> usize {
        self.max_bulk_keys
    }

    /// Resolve a namespace name or raw store id to an accessor.
    pub fn accessor(&self, namespace: &str) -> SdkResult<StoreAccessor> {
        Ok(self.registry.resolve_str(namespace)?.accessor())
    }

    // ---- Key-value operations ----

    pub async fn list_keys(
        &self,
        namespace: &str,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> SdkResult<KeyPage> {
        Ok(self
            .accessor(namespace)?
            .list_page(prefix, cursor, limit)
            .await?)
    }

    /// Every key in `namespace` matching `prefix`.
    pub async fn list_all_keys(&self, namespace: &str, prefix: Option<&str>) -> SdkResult<Vec<String>> {
        Ok(self.accessor(namespace)?.list_all(prefix).await?)
    }

    pub async fn count_keys(&self, namespace: &str, prefix: Option<&str>) -> SdkResult<usize> {
        Ok(self.accessor(namespace)?.count(prefix).await?)
    }

    pub async fn get(&self, namespace: &str, key: &str) -> SdkResult<Option<String>> {
        Ok(self.accessor(namespace)?.get(key).await?)
    }

    pub async fn get_entry(&self, namespace: &str, key: &str) -> SdkResult<Option<Entry>> {
        Ok(self.accessor(namespace)?.get_entry(key).await?)
    }

    pub async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
        metadata: Option<Metadata>,
    ) -> SdkResult<()> {
        Ok(self.accessor(namespace)?.put(key, value, metadata).await?)
    }

    /// Delete `key`; returns whether it existed.
    pub async fn delete(&self, namespace: &str, key: &str) -> SdkResult<bool> {
        Ok(self.accessor(namespace)?.delete(key).await?)
    }

    pub async fn bulk_get(
        &self,
        namespace: &str,
        keys: &[String],
    ) -> SdkResult<BTreeMap<String, BulkValue>> {
        Ok(self
            .accessor(namespace)?
            .get_many(keys, self.max_bulk_keys)
            .await?)
    }

    // ---- Discovery ----

    pub fn namespace_overview(&self) -> NamespaceOverview {
        NamespaceOverview {
            total: self.registry.catalog().len(),
            categories: self.registry.by_category(),
        }
    }

    pub fn folder_mappings(&self) -> Vec<ClassificationMapping> {
        self.router.mappings()
    }

    /// Route `folder` and count every key in the owning namespace.
    pub async fn folder_stats(&self, folder: &str) -> SdkResult<FolderStats> {
        let (classification_key, ns) = self.router.route_normalized(folder)?;
        let entry_count = self.registry.resolve_namespace(ns)?.accessor().count(None).await?;
        debug!(folder, namespace = %ns.name, entry_count, "folder stats");
        Ok(FolderStats {
            classification_key,
            human_name: ns.name.clone(),
            store_id: ns.store_id.clone(),
            entry_count,
        })
    }

    // ---- Composite operations ----

    pub async fn store_split(&self, write: SplitWrite) -> SdkResult<SplitReceipt> {
        split::write_split(&self.registry, &self.router, write).await
    }

    /// Probe every non-reserved namespace not named in `excluded`.
    pub async fn health(&self, excluded: &[String]) -> HealthReport {
        health::scan(&self.registry, excluded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use kvr_registry::RegistryError;
    use kvr_store::{InMemoryKvStore, KvStore, StoreError};
    use serde_json::json;

    fn fleet() -> Fleet {
        Fleet::in_memory(Catalog::builtin())
    }

    #[tokio::test]
    async fn court_of_appeal_lists_exactly_what_was_stored() {
        let fleet = fleet();
        for key in ["a", "b", "c"] {
            fleet.put("court-of-appeal", key, "v", None).await.unwrap();
        }
        fleet.put("high-court", "z", "v", None).await.unwrap();

        let keys = fleet.list_all_keys("court-of-appeal", None).await.unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(fleet.count_keys("court-of-appeal", None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn round_trip_by_name_and_by_id() {
        let fleet = fleet();
        fleet.put("dwp", "claim-7", "pending", None).await.unwrap();

        assert_eq!(
            fleet.get("DWP_KV", "claim-7").await.unwrap().as_deref(),
            Some("pending")
        );
        assert!(fleet.delete("dwp", "claim-7").await.unwrap());
        assert_eq!(fleet.get("dwp", "claim-7").await.unwrap(), None);
        assert!(!fleet.delete("dwp", "claim-7").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_namespace_is_caller_error() {
        let err = fleet().get("nowhere", "k").await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Registry(RegistryError::UnknownNamespace { .. })
        ));
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn bulk_get_respects_configured_cap() {
        let fleet = fleet().with_max_bulk_keys(2);
        let keys: Vec<String> = ["a", "b", "c"].iter().map(|k| k.to_string()).collect();

        let err = fleet.bulk_get("hmcts", &keys).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Store(StoreError::TooManyKeys { requested: 3, max: 2 })
        ));
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn bulk_get_mixes_present_and_absent() {
        let fleet = fleet();
        fleet.put("hmcts", "a", "1", None).await.unwrap();
        let keys = vec!["a".to_string(), "b".to_string()];

        let result = fleet.bulk_get("hmcts", &keys).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "a": "1", "b": null })
        );
    }

    #[tokio::test]
    async fn folder_stats_ignores_binding_named_like_owner() {
        let catalog = Catalog::builtin();
        let decoy: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new("decoy"));
        let bindings = StoreBindings::in_memory(&catalog)
            .with(StoreId::new("ombudsman").unwrap(), decoy.clone());
        let fleet = Fleet::new(NamespaceRegistry::new(catalog, bindings));

        fleet.put("OMBUDSMAN_KV", "m1", "v", None).await.unwrap();
        decoy.put("x", Entry::new("v")).await.unwrap();
        decoy.put("y", Entry::new("v")).await.unwrap();

        let stats = fleet.folder_stats("INBOX/Complaints/Ombudsman").await.unwrap();
        assert_eq!(stats.entry_count, 1);
    }

    #[tokio::test]
    async fn folder_stats_counts_owning_namespace() {
        let fleet = fleet();
        for key in ["m1", "m2"] {
            fleet.put("ombudsman", key, "v", None).await.unwrap();
        }

        let stats = fleet.folder_stats("INBOX/Complaints/Ombudsman/").await.unwrap();
        assert_eq!(stats.classification_key, "INBOX/Complaints/Ombudsman");
        assert_eq!(stats.human_name, "ombudsman");
        assert_eq!(stats.store_id.as_str(), "OMBUDSMAN_KV");
        assert_eq!(stats.entry_count, 2);

        assert!(matches!(
            fleet.folder_stats("INBOX/Nope").await,
            Err(SdkError::Registry(RegistryError::UnmappedClassification(_)))
        ));
    }

    #[test]
    fn overview_groups_every_namespace() {
        let fleet = fleet();
        let overview = fleet.namespace_overview();
        let listed: usize = overview.categories.values().map(Vec::len).sum();
        assert_eq!(listed, overview.total);

        let json = serde_json::to_value(&overview).unwrap();
        assert!(json["categories"]["courts"]
            .as_array()
            .unwrap()
            .contains(&json!("court-of-appeal")));
    }

    #[tokio::test]
    async fn split_write_through_fleet() {
        let fleet = fleet();
        let receipt = fleet
            .store_split(SplitWrite::new("INBOX/Government/HMCTS", "msg-9", "meta", "body"))
            .await
            .unwrap();

        assert_eq!(receipt.namespace, "hmcts");
        assert_eq!(
            fleet.get("email-bodies", &receipt.body_key).await.unwrap().as_deref(),
            Some("body")
        );
        assert_eq!(fleet.get("hmcts", "msg-9").await.unwrap().as_deref(), Some("meta"));
    }

    #[tokio::test]
    async fn health_over_empty_fleet_is_ok() {
        let report = fleet().health(&[]).await;
        assert!(report.is_ok());
        assert!(report.counts.values().all(|&c| c == 0));
    }
}
