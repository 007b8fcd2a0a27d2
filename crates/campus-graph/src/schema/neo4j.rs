//! Neo4j implementation of the schema connection.

use async_trait::async_trait;
use neo4rs::{Query, Row};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::applier::{ExistingConstraint, SchemaConnection};
use super::spec::ConstraintSpec;
use crate::GraphClient;
use crate::error::{SchemaError, SchemaResult};

const SHOW_CONSTRAINTS: &str = "SHOW CONSTRAINTS YIELD name, type, entityType, labelsOrTypes, properties \
     RETURN name, type, entityType, labelsOrTypes, properties";

impl GraphClient {
    /// Read the database's constraint catalog.
    pub async fn constraints(&self) -> anyhow::Result<Vec<ExistingConstraint>> {
        let rows = self.query(Query::new(SHOW_CONSTRAINTS.to_string())).await?;
        rows.iter().map(constraint_from_row).collect()
    }

    /// Map a failed call to a schema error. If the server still answers a ping the
    /// statement itself was rejected; otherwise the connection is gone.
    async fn classify(&self, err: anyhow::Error, constraint: Option<&str>) -> SchemaError {
        let message = format!("{:#}", err);
        match (self.ping().await, constraint) {
            (Ok(()), Some(name)) => SchemaError::Statement {
                constraint: name.to_string(),
                message,
            },
            (Ok(()), None) => SchemaError::Catalog(message),
            (Err(ping_err), _) => {
                debug!(error = %format!("{:#}", ping_err), "Ping after failed statement also failed");
                SchemaError::Connection {
                    constraint: constraint.map(str::to_string),
                    message,
                }
            }
        }
    }
}

/// Typed access to the columns of a result row.
trait RowFields {
    fn field<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T>;
}

impl RowFields for Row {
    fn field<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        self.get(key)
            .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", key, e))
    }
}

fn constraint_from_row(row: &impl RowFields) -> anyhow::Result<ExistingConstraint> {
    Ok(ExistingConstraint {
        name: row.field("name")?,
        kind: row.field("type")?,
        entity_type: row.field("entityType")?,
        labels: row.field("labelsOrTypes")?,
        properties: row.field("properties")?,
    })
}

#[async_trait]
impl SchemaConnection for GraphClient {
    async fn list_constraints(&self) -> SchemaResult<Vec<ExistingConstraint>> {
        match self.constraints().await {
            Ok(constraints) => Ok(constraints),
            Err(e) => Err(self.classify(e, None).await),
        }
    }

    async fn create_unique_constraint(&self, spec: &ConstraintSpec) -> SchemaResult<()> {
        let statement = spec.to_cypher();
        debug!(constraint = %spec.name, %statement, "Creating constraint");

        match self.execute(Query::new(statement)).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.classify(e, Some(&spec.name)).await),
        }
    }
}
