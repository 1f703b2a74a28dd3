use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use sv_namespace::{NamespaceConfig, NamespaceManager, RenamePolicy, SaveStatus};
use sv_server::{ServerConfig, SheetServer, StoreConfig};
use sv_store::FsObjectStore;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Save(args) => cmd_save(args, format).await,
        Command::Load(args) => cmd_load(args).await,
        Command::List(args) => cmd_list(args, format).await,
    }
}

fn open_manager(store: &StoreArgs, policy: RenamePolicy) -> anyhow::Result<NamespaceManager> {
    let config = NamespaceConfig {
        prefix: store.prefix.clone(),
        rename_policy: policy,
        ..Default::default()
    };
    let backend = Arc::new(FsObjectStore::new(store.root.clone()));
    NamespaceManager::new(backend, config).context("invalid namespace configuration")
}

/// Resolve the effective server configuration from file and flags.
pub fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = &args.root {
        config.store = StoreConfig::Filesystem { root: root.clone() };
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    if config.store == StoreConfig::Memory {
        tracing::warn!("serving from an in-memory store; sheets are lost on exit");
    }
    println!(
        "SheetVault server on {} (prefix: {})",
        config.bind_addr.to_string().bold(),
        config.namespace.prefix
    );
    SheetServer::new(config)?.serve().await?;
    Ok(())
}

async fn cmd_save(args: SaveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let body = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let id = args
        .id
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let policy = if args.copy_previous {
        RenamePolicy::CopyPrevious
    } else {
        RenamePolicy::WriteSubmitted
    };

    let manager = open_manager(&args.store, policy)?;
    let outcome = manager
        .save(&args.name, &id, body, args.content_type.as_deref())
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            let verb = match outcome.status {
                SaveStatus::Created => "Created".green(),
                SaveStatus::Updated => "Updated".green(),
                SaveStatus::Renamed => "Renamed".yellow(),
            };
            println!("{} {} {}", "✓".green().bold(), verb, outcome.key.name().bold());
            println!("  Id:  {}", outcome.key.id().cyan());
            println!("  Key: {}", outcome.key.as_str().dimmed());
        }
    }
    Ok(())
}

async fn cmd_load(args: LoadArgs) -> anyhow::Result<()> {
    let manager = open_manager(&args.store, RenamePolicy::default())?;
    let sheet = manager.load(&args.query, None).await?;
    write_body(&mut std::io::stdout().lock(), &sheet.body)
}

/// Write a payload verbatim; sheets are opaque bytes.
fn write_body(out: &mut impl Write, body: &[u8]) -> anyhow::Result<()> {
    out.write_all(body)?;
    out.flush()?;
    Ok(())
}

async fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let manager = open_manager(&args.store, RenamePolicy::default())?;
    let names = manager.list().await?;
    match format {
        OutputFormat::Json => println!("{}", json!(names)),
        OutputFormat::Text if names.is_empty() => println!("No character sheets."),
        OutputFormat::Text => {
            for name in names {
                println!("  {}", name.bold());
            }
        }
    }
    Ok(())
}
