use std::collections::BTreeMap;

use kvr_types::{ClassificationMapping, Namespace};

use crate::catalog::Catalog;
use crate::error::{RegistryError, Result};
use crate::names::normalize_classification_key;

/// Maps classification keys to the namespace that owns them.
#[derive(Clone, Debug)]
pub struct EntityRouter {
    routes: BTreeMap<String, Namespace>,
}

impl EntityRouter {
    pub fn new(catalog: &Catalog) -> Self {
        let routes = catalog
            .classification_table()
            .iter()
            .filter_map(|(key, name)| Some((key.clone(), catalog.get(name)?.clone())))
            .collect();
        Self { routes }
    }

    /// The owning namespace for `classification_key`.
    ///
    /// Surrounding whitespace and trailing `/` are ignored; matching is
    /// otherwise exact.
    pub fn route(&self, classification_key: &str) -> Result<&Namespace> {
        self.route_normalized(classification_key).map(|(_, ns)| ns)
    }

    /// Like [`Self::route`], also returning the normalized key that matched.
    pub fn route_normalized(&self, classification_key: &str) -> Result<(String, &Namespace)> {
        let key = normalize_classification_key(classification_key)?;
        match self.routes.get(&key) {
            Some(ns) => Ok((key, ns)),
            None => Err(RegistryError::UnmappedClassification(key)),
        }
    }

    /// Every mapping, sorted by classification key.
    pub fn mappings(&self) -> Vec<ClassificationMapping> {
        self.routes
            .iter()
            .map(|(key, ns)| ClassificationMapping {
                classification_key: key.clone(),
                store_id: ns.store_id.clone(),
                human_name: ns.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_folder() {
        let router = EntityRouter::new(&Catalog::builtin());
        let ns = router.route("INBOX/Courts/Court of Appeal").unwrap();
        assert_eq!(ns.name, "court-of-appeal");
        assert_eq!(ns.store_id.as_str(), "COURT_OF_APPEAL_KV");
    }

    #[test]
    fn trailing_slash_and_whitespace_ignored() {
        let router = EntityRouter::new(&Catalog::builtin());
        assert_eq!(router.route(" INBOX/Government/DWP/ ").unwrap().name, "dwp");
    }

    #[test]
    fn normalized_key_is_returned() {
        let router = EntityRouter::new(&Catalog::builtin());
        let (key, ns) = router.route_normalized("  INBOX/Complaints/ICO/").unwrap();
        assert_eq!(key, "INBOX/Complaints/ICO");
        assert_eq!(ns.name, "ico-complaints");
    }

    #[test]
    fn unmapped_folder() {
        let router = EntityRouter::new(&Catalog::builtin());
        let err = router.route("INBOX/Spam").unwrap_err();
        assert!(matches!(err, RegistryError::UnmappedClassification(ref k) if k == "INBOX/Spam"));
        assert!(err.is_caller_error());

        // Matching is case-sensitive.
        assert!(router.route("inbox/courts/court of appeal").is_err());
    }

    #[test]
    fn malformed_key_is_rejected() {
        let router = EntityRouter::new(&Catalog::builtin());
        assert!(matches!(
            router.route("INBOX//Courts"),
            Err(RegistryError::InvalidClassification { .. })
        ));
    }

    #[test]
    fn mappings_are_sorted() {
        let router = EntityRouter::new(&Catalog::builtin());
        let mappings = router.mappings();
        assert_eq!(mappings.len(), router.len());
        assert!(mappings
            .windows(2)
            .all(|w| w[0].classification_key < w[1].classification_key));
    }
}
