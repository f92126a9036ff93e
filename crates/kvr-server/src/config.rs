use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use kvr_registry::Catalog;

use crate::error::{ServerError, ServerResult};

/// Server settings, read from TOML.
///
/// Every field is optional in the file:
///
/// ```toml
/// bind_addr = "0.0.0.0:8787"
/// catalog_path = "catalog.toml"
/// max_bulk_keys = 50
/// health_excluded = ["audit-log"]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Namespace catalog file. The built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub max_bulk_keys: usize,
    /// Namespaces skipped by the fleet health scan, on top of system ones.
    pub health_excluded: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            catalog_path: None,
            max_bulk_keys: 100,
            health_excluded: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))?;
        if config.max_bulk_keys == 0 {
            return Err(ServerError::Config("max_bulk_keys must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> ServerResult<Catalog> {
        match &self.catalog_path {
            Some(path) => Ok(Catalog::load(path)?),
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8787".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_bulk_keys, 100);
        assert!(c.catalog_path.is_none());
        assert!(c.health_excluded.is_empty());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = ServerConfig::from_toml_str("max_bulk_keys = 25").unwrap();
        assert_eq!(c.max_bulk_keys, 25);
        assert_eq!(c.bind_addr, ServerConfig::default().bind_addr);
    }

    #[test]
    fn reject_bad_values() {
        assert!(matches!(
            ServerConfig::from_toml_str("max_bulk_keys = 0"),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("bind_addr = \"not an address\""),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"0.0.0.0:9000\"").unwrap();
        writeln!(file, "health_excluded = [\"audit-log\"]").unwrap();

        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.health_excluded, vec!["audit-log"]);
    }

    #[test]
    fn builtin_catalog_when_unset() {
        let catalog = ServerConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let c = ServerConfig {
            catalog_path: Some("/definitely/not/here.toml".into()),
            ..ServerConfig::default()
        };
        assert!(matches!(c.load_catalog(), Err(ServerError::Registry(_))));
    }
}
