//! Neo4j connection client.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};

/// Configuration for connecting to Neo4j.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database. `None` uses the server default (`neo4j`).
    pub database: Option<String>,
    pub max_connections: usize,
    pub connect_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: None,
            max_connections: 4,
            connect_timeout_secs: 10,
        }
    }
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl GraphConfig {
    /// Build a config from `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and
    /// `NEO4J_DATABASE`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            uri: lookup("NEO4J_URI").unwrap_or(defaults.uri),
            user: lookup("NEO4J_USER").unwrap_or(defaults.user),
            password: lookup("NEO4J_PASSWORD").unwrap_or(defaults.password),
            database: lookup("NEO4J_DATABASE").filter(|db| !db.is_empty()),
            ..defaults
        }
    }

    /// Parse a TOML config document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> SchemaResult<Self> {
        toml::from_str(content).map_err(|e| SchemaError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::read(path, e))?;
        toml::from_str(&content)
            .map_err(|e| SchemaError::Config(format!("{}: {}", path.display(), e)))
    }

    fn database_name(&self) -> &str {
        self.database.as_deref().unwrap_or("neo4j")
    }
}

/// Client for Neo4j operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so `Graph::connect` alone does not touch the
    /// network. A `RETURN 1` ping forces the bolt handshake so an unreachable server
    /// fails here and the caller's timeout applies.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database_name())
            .max_connections(config.max_connections)
            .fetch_size(50)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        let client = Self { graph };
        client.ping().await?;
        debug!(uri = %config.uri, database = config.database_name(), "Connected to Neo4j");

        Ok(client)
    }

    /// Create a new GraphClient from the `NEO4J_*` environment.
    pub async fn connect_from_env() -> Result<Self> {
        Self::connect(&GraphConfig::from_env()).await
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await
            .context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result stream")? {
            rows.push(row);
        }
        Ok(rows)
    }
}
