//! The deployment table: which namespaces exist, how they are grouped, which
//! classification keys they own, and which namespace holds split-entity bodies.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use kvr_types::{Category, ClassificationMapping, Namespace, StoreId};

use crate::error::{RegistryError, Result};
use crate::names::{normalize_classification_key, validate_namespace_name, validate_store_id};

/// One namespace row of a catalog file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub name: String,
    pub store_id: String,
    pub category: Category,
}

/// One classification row of a catalog file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Classification key, e.g. a mail-folder path.
    pub key: String,
    /// Name of the owning namespace.
    pub namespace: String,
}

/// Unvalidated catalog as read from TOML.
///
/// ```toml
/// bodies_namespace = "email-bodies"
///
/// [[namespaces]]
/// name = "email-bodies"
/// store_id = "EMAIL_BODIES_KV"
/// category = "system"
///
/// [[classifications]]
/// key = "INBOX/Courts/High Court"
/// namespace = "high-court"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub bodies_namespace: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,
    #[serde(default)]
    pub classifications: Vec<ClassificationConfig>,
}

/// A validated, immutable deployment table.
#[derive(Clone, Debug)]
pub struct Catalog {
    namespaces: BTreeMap<String, Namespace>,
    by_store_id: HashMap<StoreId, String>,
    /// Normalized classification key -> namespace name.
    classifications: BTreeMap<String, String>,
    bodies: String,
}

impl Catalog {
    /// Validate a config into a catalog.
    ///
    /// Fails on invalid or duplicate names, duplicate store ids, a store id
    /// equal to another namespace's name, duplicate or dangling classification
    /// rows, and a bodies namespace the catalog does not define.
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let mut namespaces = BTreeMap::new();
        let mut by_store_id: HashMap<StoreId, String> = HashMap::new();

        for row in config.namespaces {
            validate_namespace_name(&row.name)?;
            validate_store_id(&row.store_id)?;
            let store_id = StoreId::new(row.store_id.as_str()).map_err(|e| {
                RegistryError::InvalidName {
                    name: row.store_id.clone(),
                    reason: e.to_string(),
                }
            })?;

            if namespaces.contains_key(&row.name) {
                return Err(RegistryError::DuplicateNamespace(row.name));
            }
            if let Some(first) = by_store_id.get(&store_id) {
                return Err(RegistryError::DuplicateStoreId {
                    store_id: store_id.to_string(),
                    first: first.clone(),
                    second: row.name,
                });
            }

            by_store_id.insert(store_id.clone(), row.name.clone());
            namespaces.insert(
                row.name.clone(),
                Namespace::new(row.name, store_id, row.category),
            );
        }

        // Caller input is tried as a store id first.
        for (store_id, owner) in &by_store_id {
            if store_id.as_str() != owner.as_str() && namespaces.contains_key(store_id.as_str()) {
                return Err(RegistryError::StoreIdShadowsName {
                    store_id: store_id.to_string(),
                    owner: owner.clone(),
                });
            }
        }

        if !namespaces.contains_key(&config.bodies_namespace) {
            return Err(RegistryError::MissingBodiesNamespace(config.bodies_namespace));
        }

        let mut classifications = BTreeMap::new();
        for row in config.classifications {
            let key = normalize_classification_key(&row.key)?;
            if !namespaces.contains_key(&row.namespace) {
                return Err(RegistryError::UnknownClassificationTarget {
                    key,
                    namespace: row.namespace,
                });
            }
            if classifications.insert(key.clone(), row.namespace).is_some() {
                return Err(RegistryError::DuplicateClassification(key));
            }
        }

        Ok(Self {
            namespaces,
            by_store_id,
            classifications,
            bodies: config.bodies_namespace,
        })
    }

    /// Parse and validate a TOML catalog.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CatalogConfig =
            toml::from_str(source).map_err(|e| RegistryError::Config(e.to_string()))?;
        Self::from_config(config)
    }

    /// Read, parse, and validate a TOML catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&source)?;
        info!(
            path = %path.display(),
            namespaces = catalog.len(),
            classifications = catalog.classifications.len(),
            "loaded namespace catalog"
        );
        Ok(catalog)
    }

    /// The built-in deployment table.
    pub fn builtin() -> Self {
        Self::from_config(builtin_config()).expect("built-in catalog is valid")
    }

    /// Look up a namespace by human-readable name.
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Look up a namespace by store id.
    pub fn by_store_id(&self, store_id: &str) -> Option<&Namespace> {
        let name = self.by_store_id.get(store_id)?;
        self.namespaces.get(name)
    }

    /// All namespaces, sorted by name.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// All namespace names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.namespaces.keys().cloned().collect()
    }

    /// Number of namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Namespace names grouped by category. Every category is present, even
    /// when empty.
    pub fn by_category(&self) -> BTreeMap<Category, Vec<String>> {
        let mut grouped: BTreeMap<Category, Vec<String>> =
            Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
        for ns in self.namespaces.values() {
            grouped.entry(ns.category).or_default().push(ns.name.clone());
        }
        grouped
    }

    /// The namespace holding split-entity bodies.
    pub fn bodies(&self) -> &Namespace {
        // Presence is checked in `from_config`.
        &self.namespaces[&self.bodies]
    }

    /// Classification rows, sorted by key.
    pub fn classification_mappings(&self) -> Vec<ClassificationMapping> {
        self.classifications
            .iter()
            .filter_map(|(key, name)| {
                let ns = self.namespaces.get(name)?;
                Some(ClassificationMapping {
                    classification_key: key.clone(),
                    store_id: ns.store_id.clone(),
                    human_name: ns.name.clone(),
                })
            })
            .collect()
    }

    pub(crate) fn classification_table(&self) -> &BTreeMap<String, String> {
        &self.classifications
    }
}

const BUILTIN_BODIES: &str = "email-bodies";

const BUILTIN_NAMESPACES: &[(&str, &str, Category)] = &[
    ("system-config", "SYSTEM_CONFIG_KV", Category::System),
    ("email-bodies", "EMAIL_BODIES_KV", Category::System),
    ("audit-log", "AUDIT_LOG_KV", Category::System),
    ("court-of-appeal", "COURT_OF_APPEAL_KV", Category::Courts),
    ("high-court", "HIGH_COURT_KV", Category::Courts),
    ("county-court", "COUNTY_COURT_KV", Category::Courts),
    ("employment-tribunal", "EMPLOYMENT_TRIBUNAL_KV", Category::Courts),
    ("supreme-court", "SUPREME_COURT_KV", Category::Courts),
    ("claimant-correspondence", "CLAIMANT_CORRESPONDENCE_KV", Category::Claimants),
    ("claimant-evidence", "CLAIMANT_EVIDENCE_KV", Category::Claimants),
    ("witness-statements", "WITNESS_STATEMENTS_KV", Category::Claimants),
    ("hmcts", "HMCTS_KV", Category::Government),
    ("ministry-of-justice", "MINISTRY_OF_JUSTICE_KV", Category::Government),
    ("legal-aid-agency", "LEGAL_AID_AGENCY_KV", Category::Government),
    ("dwp", "DWP_KV", Category::Government),
    ("ombudsman", "OMBUDSMAN_KV", Category::Complaints),
    ("police-complaints", "POLICE_COMPLAINTS_KV", Category::Complaints),
    ("sra-complaints", "SRA_COMPLAINTS_KV", Category::Complaints),
    ("ico-complaints", "ICO_COMPLAINTS_KV", Category::Complaints),
];

const BUILTIN_CLASSIFICATIONS: &[(&str, &str)] = &[
    ("INBOX/Courts/Court of Appeal", "court-of-appeal"),
    ("INBOX/Courts/High Court", "high-court"),
    ("INBOX/Courts/County Court", "county-court"),
    ("INBOX/Courts/Employment Tribunal", "employment-tribunal"),
    ("INBOX/Courts/Supreme Court", "supreme-court"),
    ("INBOX/Claimants/Correspondence", "claimant-correspondence"),
    ("INBOX/Claimants/Evidence", "claimant-evidence"),
    ("INBOX/Claimants/Witness Statements", "witness-statements"),
    ("INBOX/Government/HMCTS", "hmcts"),
    ("INBOX/Government/Ministry of Justice", "ministry-of-justice"),
    ("INBOX/Government/Legal Aid Agency", "legal-aid-agency"),
    ("INBOX/Government/DWP", "dwp"),
    ("INBOX/Complaints/Ombudsman", "ombudsman"),
    ("INBOX/Complaints/Police", "police-complaints"),
    ("INBOX/Complaints/SRA", "sra-complaints"),
    ("INBOX/Complaints/ICO", "ico-complaints"),
];

/// The built-in table in config form.
pub fn builtin_config() -> CatalogConfig {
    CatalogConfig {
        bodies_namespace: BUILTIN_BODIES.to_string(),
        namespaces: BUILTIN_NAMESPACES
            .iter()
            .map(|(name, store_id, category)| NamespaceConfig {
                name: name.to_string(),
                store_id: store_id.to_string(),
                category: *category,
            })
            .collect(),
        classifications: BUILTIN_CLASSIFICATIONS
            .iter()
            .map(|(key, namespace)| ClassificationConfig {
                key: key.to_string(),
                namespace: namespace.to_string(),
            })
            .collect(),
    }
}
