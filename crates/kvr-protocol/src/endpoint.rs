use serde::{Deserialize, Serialize};

/// HTTP endpoint paths for the KVR tool protocol.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const TOOLS: &str = "/v1/tools";
    pub const TOOL_CALL: &str = "/v1/tools/call";
}

/// Liveness response. Says nothing about the stores behind the server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Server identity and surface size.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub tools: usize,
    pub namespaces: usize,
}
