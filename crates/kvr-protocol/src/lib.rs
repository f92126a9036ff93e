//! Tool protocol for KVR.
//!
//! Defines the tool catalogue, the typed and validated arguments of every
//! tool, and the call/output framing carried by the HTTP transport.

pub mod args;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod tool;

pub use args::{
    BulkGetArgs, CountKeysArgs, FolderStatsArgs, KeyArgs, ListKeysArgs, PutArgs, StoreEmailArgs,
    ToolRequest, MAX_BULK_KEYS,
};
pub use endpoint::{endpoints, HealthResponse, InfoResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    CountKeysResponse, DeleteResponse, ListKeysResponse, PutResponse, StoreEmailResponse,
    ToolCall, ToolOutput,
};
pub use tool::{tool_definitions, ToolDefinition, ToolName};
