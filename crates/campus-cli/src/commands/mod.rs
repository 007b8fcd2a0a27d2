//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use campus_graph::{GraphClient, GraphConfig, SchemaError, SchemaResult};
use clap::{Args, Parser, Subcommand};

pub mod health;
pub mod schema;

/// Campus - course catalog graph schema tooling
#[derive(Parser)]
#[command(name = "campus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find Neo4j. Flags and `NEO4J_*` variables override the config file.
#[derive(Args, Default)]
pub struct ConnectionArgs {
    /// TOML file with connection settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bolt URI
    #[arg(long, global = true, env = "NEO4J_URI")]
    pub uri: Option<String>,

    /// Database user
    #[arg(long, global = true, env = "NEO4J_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, global = true, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name (server default when omitted)
    #[arg(long, global = true, env = "NEO4J_DATABASE")]
    pub database: Option<String>,
}

impl ConnectionArgs {
    /// Resolve the effective config: file (or defaults), then overrides.
    pub fn resolve(&self) -> SchemaResult<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::from_file(path)?,
            None => GraphConfig::default(),
        };

        if let Some(uri) = &self.uri {
            config.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(database) = self.database.as_ref().filter(|db| !db.is_empty()) {
            config.database = Some(database.clone());
        }

        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Schema constraint management
    #[command(subcommand)]
    Schema(schema::SchemaCommands),

    /// Check that Neo4j is reachable
    Health,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Schema(cmd) => schema::execute(cmd, &self.connection).await,
            Commands::Health => health::execute(&self.connection).await,
        }
    }
}

/// Connect within the configured timeout.
pub async fn connect(config: &GraphConfig) -> SchemaResult<GraphClient> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);

    match tokio::time::timeout(timeout, GraphClient::connect(config)).await {
        Ok(Ok(client)) => Ok(client),
        Ok(Err(e)) => Err(SchemaError::connection(format!("{:#}", e))),
        Err(_) => Err(SchemaError::connection(format!(
            "no answer from {} within {}s",
            config.uri, config.connect_timeout_secs
        ))),
    }
}
