use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tvhub_core::SourceKind;

use crate::config::StorageBackend;

/// tvhub: manage a list of streaming sources and publish them as one subscription
#[derive(Parser, Debug)]
#[command(name = "tvhub", version)]
#[command(about = "Manage streaming sources and serve an aggregated subscription", long_about = None)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, env = "TVHUB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (admin UI, /api/config, /subscribe)
    Serve(ServeArgs),

    /// Administer sources on a running server
    Sources(SourcesArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Shared secret for /api/config
    #[arg(long, env = "TVHUB_AUTH_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Storage backend
    #[arg(long, value_enum)]
    pub store: Option<StorageBackend>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Base URL of the tvhub server
    #[arg(long, env = "TVHUB_SERVER", default_value = "http://127.0.0.1:8787")]
    pub server: String,

    /// Access key (the server's shared secret)
    #[arg(long, env = "TVHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: SourcesCommands,
}

#[derive(Subcommand, Debug)]
pub enum SourcesCommands {
    /// List all sources
    List,

    /// Add a new source
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        url: String,

        /// mixed, spider or live
        #[arg(long = "type", default_value_t = SourceKind::Mixed)]
        kind: SourceKind,

        /// Create the source disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Edit fields of an existing source
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long = "type")]
        kind: Option<SourceKind>,

        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Delete a source
    Remove { id: String },

    /// Flip a source between enabled and disabled
    Toggle { id: String },

    /// Print the public subscription URL
    Link,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
