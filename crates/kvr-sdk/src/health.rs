//! Fleet health: one cheap probe per namespace, run concurrently.
//!
//! A probe lists a single key. It tells "empty", "exactly one", and "more than
//! one" apart without enumerating the namespace, so the scan costs one store
//! call per namespace no matter how large the stores are.

use std::collections::{BTreeMap, HashSet};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kvr_registry::NamespaceRegistry;
use kvr_types::Namespace;

/// Count reported for a namespace holding more than one key, or whose probe
/// failed.
pub const UNKNOWN_COUNT: i64 = -1;

const NOTE: &str = "-1 means more than one key (exact count not computed) or an unreachable namespace";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Outcome of a fleet scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Namespace name to probe result: `0`, `1`, or [`UNKNOWN_COUNT`].
    pub counts: BTreeMap<String, i64>,
    /// Namespaces whose probe failed, sorted.
    pub unreachable: Vec<String>,
    pub note: String,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

enum Probe {
    Count(i64),
    Unreachable,
}

async fn probe(registry: &NamespaceRegistry, ns: &Namespace) -> Probe {
    let handle = match registry.resolve_namespace(ns) {
        Ok(handle) => handle,
        Err(e) => {
            warn!(namespace = %ns.name, error = %e, "health probe could not resolve namespace");
            return Probe::Unreachable;
        }
    };

    match handle.accessor().list_page(None, None, Some(1)).await {
        Ok(page) if page.complete && page.keys.len() <= 1 => Probe::Count(page.keys.len() as i64),
        Ok(_) => Probe::Count(UNKNOWN_COUNT),
        Err(e) => {
            warn!(namespace = %ns.name, error = %e, "health probe failed");
            Probe::Unreachable
        }
    }
}

/// Probe every namespace except reserved ones and the names in `excluded`.
pub async fn scan(registry: &NamespaceRegistry, excluded: &[String]) -> HealthReport {
    let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
    let targets: Vec<&Namespace> = registry
        .namespaces()
        .filter(|ns| !ns.category.is_reserved() && !excluded.contains(ns.name.as_str()))
        .collect();

    let probes = targets.iter().map(|ns| async move {
        let outcome = probe(registry, ns).await;
        (ns.name.clone(), outcome)
    });

    let mut counts = BTreeMap::new();
    let mut unreachable = Vec::new();
    for (name, outcome) in join_all(probes).await {
        match outcome {
            Probe::Count(n) => {
                counts.insert(name, n);
            }
            Probe::Unreachable => {
                counts.insert(name.clone(), UNKNOWN_COUNT);
                unreachable.push(name);
            }
        }
    }
    unreachable.sort();

    let status = if unreachable.is_empty() {
        HealthStatus::Ok
    } else {
        HealthStatus::Degraded
    };
    debug!(probed = counts.len(), unreachable = unreachable.len(), "fleet scan complete");

    HealthReport {
        status,
        counts,
        unreachable,
        note: NOTE.to_string(),
    }
}
