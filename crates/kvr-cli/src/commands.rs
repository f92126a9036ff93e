use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use kvr_protocol::{tool_definitions, ToolCall};
use kvr_registry::Catalog;
use kvr_sdk::Fleet;
use kvr_server::{KvrServer, ServerConfig, ToolDispatcher};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Namespaces(args) => cmd_namespaces(args, &format),
        Command::Folders(args) => cmd_folders(args, &format),
        Command::Check(args) => cmd_check(args),
        Command::Tools => cmd_tools(&format),
        Command::Call(args) => cmd_call(args, &format).await,
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }

    let server = KvrServer::in_memory(config)?;
    println!(
        "{} KVR server on {} ({} namespaces)",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.fleet().registry().catalog().len()
    );
    server.serve().await?;
    Ok(())
}

fn cmd_namespaces(args: CatalogArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let fleet = Fleet::in_memory(load_catalog(args.catalog.as_deref())?);
    let overview = fleet.namespace_overview();
    if let OutputFormat::Json = format {
        return print_json(&overview);
    }

    println!("{} namespaces", overview.total.to_string().bold());
    for (category, names) in &overview.categories {
        if names.is_empty() {
            continue;
        }
        println!("\n{}", category.as_str().yellow().bold());
        for name in names {
            let store_id = fleet
                .registry()
                .get(name)
                .map(|ns| ns.store_id.to_string())
                .unwrap_or_default();
            println!("  {:<28} {}", name, store_id.dimmed());
        }
    }
    Ok(())
}

fn cmd_folders(args: CatalogArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let fleet = Fleet::in_memory(load_catalog(args.catalog.as_deref())?);
    let mappings = fleet.folder_mappings();
    if let OutputFormat::Json = format {
        return print_json(&mappings);
    }

    if mappings.is_empty() {
        println!("No folder mappings.");
    }
    for m in &mappings {
        println!("  {:<40} → {}", m.classification_key, m.human_name.cyan());
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(Some(args.catalog.as_path()))?;
    println!("{} Catalog {} is valid", "✓".green().bold(), args.catalog.display());
    println!("  Namespaces: {}", catalog.len().to_string().bold());
    println!(
        "  Folder mappings: {}",
        catalog.classification_mappings().len().to_string().bold()
    );
    println!("  Bodies namespace: {}", catalog.bodies().name.yellow());
    Ok(())
}

fn cmd_tools(format: &OutputFormat) -> anyhow::Result<()> {
    let tools = tool_definitions();
    if let OutputFormat::Json = format {
        return print_json(&tools);
    }

    for tool in &tools {
        println!("{}", tool.name.bold());
        println!("  {}", tool.description.dimmed());
    }
    Ok(())
}

async fn cmd_call(args: CallArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(&args.args).context("--args must be a JSON object")?;
    let fleet = Fleet::in_memory(load_catalog(args.catalog.as_deref())?);
    let dispatcher = ToolDispatcher::new(fleet);

    let output = dispatcher
        .call(&ToolCall::new(args.tool, arguments))
        .await?;
    if let OutputFormat::Json = format {
        return print_json(&output);
    }

    if output.is_error {
        println!("{} {}", "✗".red().bold(), output.text.red());
    } else {
        println!("{}", output.text);
    }
    Ok(())
}
