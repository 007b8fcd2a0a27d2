//! Neo4j schema initialization (uniqueness constraints).

pub mod applier;
pub mod neo4j;
pub mod parser;
pub mod spec;

use crate::GraphClient;
use crate::error::SchemaResult;

pub use applier::{AppliedCount, Ensured, ExistingConstraint, SchemaApplier, SchemaConnection, apply_constraints};
pub use parser::{SchemaStatement, load_schema_file, parse_schema, parse_statements};
pub use spec::{ConstraintSpec, quote_identifier, validate_specs};

/// Declarative schema for the course catalog graph.
pub const CAMPUS_SCHEMA: &str = include_str!("campus.cypher");

/// Constraints of the course catalog graph, in application order.
pub fn campus_constraints() -> SchemaResult<Vec<ConstraintSpec>> {
    parse_schema(CAMPUS_SCHEMA)
}

/// Initialize the course catalog schema.
///
/// Safe to run multiple times - existing constraints are left untouched.
pub async fn initialize_schema(client: &GraphClient) -> SchemaResult<AppliedCount> {
    SchemaApplier::campus()?.apply(client).await
}
