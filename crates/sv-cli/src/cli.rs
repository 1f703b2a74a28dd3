use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sheets",
    about = "SheetVault -- character sheets under stable, renamable keys",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Save a character sheet from a file
    Save(SaveArgs),
    /// Print a stored character sheet
    Load(LoadArgs),
    /// List stored character names
    List(ListArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Serve from a directory instead of the configured store
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Store root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Namespace prefix
    #[arg(long, default_value = sv_namespace::DEFAULT_PREFIX)]
    pub prefix: String,
}

#[derive(Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Display name
    #[arg(short, long)]
    pub name: String,
    /// Stable identifier; a fresh one is minted when omitted
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub content_type: Option<String>,
    /// Copy the previous content on rename instead of writing the file
    #[arg(long)]
    pub copy_previous: bool,
    /// File holding the sheet body
    pub file: PathBuf,
}

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Name, name prefix, or full key
    pub query: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}
