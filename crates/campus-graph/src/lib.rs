//! # Campus Graph
//!
//! Schema bootstrap for the course catalog knowledge graph in Neo4j.
//!
//! Applies node-property uniqueness constraints idempotently: constraints that
//! already exist are skipped, same-named constraints that target something else
//! are reported as conflicts.

pub mod client;
pub mod error;
pub mod schema;

pub use client::{GraphClient, GraphConfig};
pub use error::{SchemaError, SchemaResult};
pub use schema::{
    AppliedCount, ConstraintSpec, ExistingConstraint, SchemaApplier, SchemaConnection,
    apply_constraints, campus_constraints, initialize_schema,
};
