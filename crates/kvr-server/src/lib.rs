//! HTTP server for KVR.
//!
//! Serves the tool catalogue and executes tool calls against a [`Fleet`] of
//! key-value namespaces.
//!
//! [`Fleet`]: kvr_sdk::Fleet

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use dispatch::ToolDispatcher;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::KvrServer;
