//! Idempotent application of uniqueness constraints.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::spec::{ConstraintSpec, format_target, validate_specs};
use crate::error::{SchemaError, SchemaResult};

/// A constraint as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingConstraint {
    pub name: String,
    /// Constraint type, e.g. `UNIQUENESS` or `NODE_KEY`.
    pub kind: String,
    /// `NODE` or `RELATIONSHIP`.
    pub entity_type: String,
    pub labels: Vec<String>,
    pub properties: Vec<String>,
}

impl ExistingConstraint {
    /// Catalog entry equivalent to what `spec` would create.
    pub fn from_spec(spec: &ConstraintSpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: "UNIQUENESS".to_string(),
            entity_type: "NODE".to_string(),
            labels: vec![spec.label.clone()],
            properties: vec![spec.property.clone()],
        }
    }

    fn is_node_uniqueness(&self) -> bool {
        self.entity_type.eq_ignore_ascii_case("NODE")
            && self.kind.to_ascii_uppercase().contains("UNIQUENESS")
    }

    /// Whether this constraint enforces exactly the uniqueness `spec` asks for.
    pub fn enforces(&self, spec: &ConstraintSpec) -> bool {
        self.is_node_uniqueness()
            && self.labels.len() == 1
            && self.labels[0] == spec.label
            && self.properties.len() == 1
            && self.properties[0] == spec.property
    }

    /// Human-readable description of what this constraint targets.
    pub fn describe(&self) -> String {
        let label = self.labels.join("|");
        let target = if self.properties.len() == 1 {
            format_target(&label, &self.properties[0])
        } else {
            format!("(:{}).({})", label, self.properties.join(", "))
        };
        format!("{} {} on {}", self.entity_type, self.kind, target)
    }
}

/// Capability to inspect and extend a database's constraint catalog.
#[async_trait]
pub trait SchemaConnection: Send + Sync {
    /// Read the current constraint catalog.
    async fn list_constraints(&self) -> SchemaResult<Vec<ExistingConstraint>>;

    /// Issue a guarded "create uniqueness constraint if not exists" statement.
    async fn create_unique_constraint(&self, spec: &ConstraintSpec) -> SchemaResult<()>;
}

/// How a single spec was ensured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    Created,
    AlreadyPresent,
}

/// Number of constraints ensured present by an apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppliedCount {
    pub created: usize,
    pub existing: usize,
}

impl AppliedCount {
    pub fn total(&self) -> usize {
        self.created + self.existing
    }

    fn record(&mut self, outcome: Ensured) {
        match outcome {
            Ensured::Created => self.created += 1,
            Ensured::AlreadyPresent => self.existing += 1,
        }
    }
}

/// Applies an ordered, validated list of constraint specs.
#[derive(Debug, Clone)]
pub struct SchemaApplier {
    specs: Vec<ConstraintSpec>,
}

impl SchemaApplier {
    /// Validate `specs` and build an applier over them.
    pub fn new(specs: Vec<ConstraintSpec>) -> SchemaResult<Self> {
        validate_specs(&specs)?;
        Ok(Self { specs })
    }

    /// Applier for the built-in course catalog schema.
    pub fn campus() -> SchemaResult<Self> {
        Self::new(super::campus_constraints()?)
    }

    pub fn specs(&self) -> &[ConstraintSpec] {
        &self.specs
    }

    /// Ensure every spec is present, in order.
    ///
    /// The catalog is read up front, so an unreachable database fails before any
    /// spec is applied. Each create is confirmed by re-reading the catalog. The first
    /// error halts the pass; constraints created before it stay in place.
    pub async fn apply<C>(&self, conn: &C) -> SchemaResult<AppliedCount>
    where
        C: SchemaConnection + ?Sized,
    {
        info!(constraints = self.specs.len(), "Applying schema constraints");

        let catalog = conn.list_constraints().await?;
        debug!(existing = catalog.len(), "Read constraint catalog");

        let mut count = AppliedCount::default();
        for spec in &self.specs {
            let outcome = ensure(conn, &catalog, spec).await.map_err(|e| {
                warn!(constraint = %spec.name, error = %e, "Schema apply halted");
                e.for_constraint(&spec.name)
            })?;
            count.record(outcome);
        }

        info!(
            created = count.created,
            existing = count.existing,
            "Schema constraints ensured"
        );
        Ok(count)
    }
}

/// Where the catalog stands on a spec.
enum Presence<'a> {
    SameName,
    OtherName(&'a ExistingConstraint),
}

/// Look `spec` up in `catalog`. A same-named constraint with another target is drift.
fn presence<'a>(catalog: &'a [ExistingConstraint], spec: &ConstraintSpec) -> SchemaResult<Option<Presence<'a>>> {
    if let Some(existing) = catalog.iter().find(|c| c.name == spec.name) {
        if existing.enforces(spec) {
            return Ok(Some(Presence::SameName));
        }
        return Err(SchemaError::Conflict {
            name: spec.name.clone(),
            expected: format!("NODE UNIQUENESS on {}", spec.target()),
            found: existing.describe(),
        });
    }

    Ok(catalog.iter().find(|c| c.enforces(spec)).map(Presence::OtherName))
}

fn warn_other_name(spec: &ConstraintSpec, existing: &ExistingConstraint) {
    warn!(
        constraint = %spec.name,
        existing = %existing.name,
        target = %spec.target(),
        "Target already constrained under another name"
    );
}

async fn ensure<C>(conn: &C, catalog: &[ExistingConstraint], spec: &ConstraintSpec) -> SchemaResult<Ensured>
where
    C: SchemaConnection + ?Sized,
{
    match presence(catalog, spec)? {
        Some(Presence::SameName) => {
            debug!(constraint = %spec.name, "Constraint already exists");
            return Ok(Ensured::AlreadyPresent);
        }
        Some(Presence::OtherName(existing)) => {
            warn_other_name(spec, existing);
            return Ok(Ensured::AlreadyPresent);
        }
        None => {}
    }

    conn.create_unique_constraint(spec).await?;

    // IF NOT EXISTS turns the create into a no-op when another caller got there
    // first, so confirm what actually landed.
    let after = conn.list_constraints().await?;
    match presence(&after, spec)? {
        Some(Presence::SameName) => {
            info!(constraint = %spec.name, target = %spec.target(), "Created constraint");
            Ok(Ensured::Created)
        }
        Some(Presence::OtherName(existing)) => {
            warn_other_name(spec, existing);
            Ok(Ensured::AlreadyPresent)
        }
        None => Err(SchemaError::Statement {
            constraint: spec.name.clone(),
            message: format!("no constraint enforces {} after create", spec.target()),
        }),
    }
}

/// Validate and apply `specs` against `conn`.
pub async fn apply_constraints<C>(specs: &[ConstraintSpec], conn: &C) -> SchemaResult<AppliedCount>
where
    C: SchemaConnection + ?Sized,
{
    SchemaApplier::new(specs.to_vec())?.apply(conn).await
}
