use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kvr",
    about = "KVR: one tool surface over many key-value namespaces",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the KVR tool server
    Serve(ServeArgs),
    /// List namespaces grouped by category
    Namespaces(CatalogArgs),
    /// List mail folders and the namespaces that own them
    Folders(CatalogArgs),
    /// Validate a catalog file
    Check(CheckArgs),
    /// List the tools the server exposes
    Tools,
    /// Run one tool call against a fresh in-memory fleet
    Call(CallArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Server config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog file (TOML); the built-in catalog when omitted
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub catalog: PathBuf,
}

#[derive(Args)]
pub struct CallArgs {
    pub tool: String,
    /// Tool arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
