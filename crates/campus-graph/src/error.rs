//! Error types for schema bootstrap operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for schema operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The database could not be reached. Transient: the whole apply may be retried.
    #[error("Connection error{}: {message}", on_constraint(.constraint))]
    Connection {
        constraint: Option<String>,
        message: String,
    },

    /// A constraint with the same name exists but targets something else.
    #[error("Constraint conflict for '{name}': expected {expected}, found {found}")]
    Conflict {
        name: String,
        expected: String,
        found: String,
    },

    /// The database answered but rejected the statement.
    #[error("Statement rejected for constraint '{constraint}': {message}")]
    Statement { constraint: String, message: String },

    /// The database answered but refused to list its constraints.
    #[error("Failed to read constraint catalog: {0}")]
    Catalog(String),

    #[error("Invalid constraint spec: {0}")]
    InvalidSpec(String),

    #[error("Schema parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

fn on_constraint(constraint: &Option<String>) -> String {
    match constraint {
        Some(name) => format!(" while applying '{}'", name),
        None => String::new(),
    }
}

impl SchemaError {
    /// Create a connection error not tied to a specific constraint.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            constraint: None,
            message: msg.into(),
        }
    }

    /// Create a file read error carrying the path.
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an invalid spec error.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    /// Attach the name of the constraint being applied, if the error has room for it
    /// and does not already name one.
    pub fn for_constraint(self, name: &str) -> Self {
        match self {
            Self::Connection {
                constraint: None,
                message,
            } => Self::Connection {
                constraint: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }

    /// Whether the caller may retry the whole apply call.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Name of the constraint this error refers to, when known.
    pub fn constraint_name(&self) -> Option<&str> {
        match self {
            Self::Connection { constraint, .. } => constraint.as_deref(),
            Self::Conflict { name, .. } => Some(name),
            Self::Statement { constraint, .. } => Some(constraint),
            _ => None,
        }
    }
}
