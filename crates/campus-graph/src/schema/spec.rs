//! Constraint specifications.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

/// A node-property uniqueness constraint: no two nodes labeled `label` may share
/// a value for `property`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub name: String,
    pub label: String,
    pub property: String,
}

impl ConstraintSpec {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            property: property.into(),
        }
    }

    /// The constrained target in `(:Label).property` form.
    pub fn target(&self) -> String {
        format_target(&self.label, &self.property)
    }

    /// Guarded Cypher statement creating this constraint.
    pub fn to_cypher(&self) -> String {
        format!(
            "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
            quote_identifier(&self.name),
            quote_identifier(&self.label),
            quote_identifier(&self.property),
        )
    }

    fn check_fields(&self) -> SchemaResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("label", &self.label),
            ("property", &self.property),
        ] {
            if value.trim().is_empty() {
                return Err(SchemaError::invalid_spec(format!(
                    "constraint '{}' has an empty {}",
                    self.name, field
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.name, self.target())
    }
}

pub(crate) fn format_target(label: &str, property: &str) -> String {
    format!("(:{}).{}", label, property)
}

/// Backtick-quote a Cypher identifier, doubling embedded backticks.
pub fn quote_identifier(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Check a spec list: non-empty, no empty fields, unique names and unique
/// (label, property) pairs.
pub fn validate_specs(specs: &[ConstraintSpec]) -> SchemaResult<()> {
    if specs.is_empty() {
        return Err(SchemaError::invalid_spec("no constraints to apply"));
    }

    let mut names = HashSet::new();
    let mut targets = HashSet::new();

    for spec in specs {
        spec.check_fields()?;

        if !names.insert(spec.name.as_str()) {
            return Err(SchemaError::invalid_spec(format!(
                "duplicate constraint name '{}'",
                spec.name
            )));
        }
        if !targets.insert((spec.label.as_str(), spec.property.as_str())) {
            return Err(SchemaError::invalid_spec(format!(
                "constraint '{}' duplicates target {}",
                spec.name,
                spec.target()
            )));
        }
    }

    Ok(())
}
