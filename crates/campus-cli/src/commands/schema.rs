//! Schema constraint CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use campus_graph::schema::{self, ConstraintSpec, SchemaApplier};
use clap::Subcommand;
use colored::Colorize;
use tracing::debug;

use super::ConnectionArgs;
use crate::output;

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Ensure all constraints exist in the database
    Apply {
        /// Schema file (defaults to the built-in course catalog schema)
        #[arg(long, short)]
        file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a schema and print its statements without connecting
    Plan {
        /// Schema file (defaults to the built-in course catalog schema)
        #[arg(long, short)]
        file: Option<PathBuf>,
    },

    /// List the constraints currently defined in the database
    Status {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn execute(cmd: SchemaCommands, connection: &ConnectionArgs) -> Result<()> {
    match cmd {
        SchemaCommands::Apply { file, json } => cmd_apply(connection, file.as_deref(), json).await,
        SchemaCommands::Plan { file } => cmd_plan(file.as_deref()),
        SchemaCommands::Status { json } => cmd_status(connection, json).await,
    }
}

fn load_specs(file: Option<&Path>) -> Result<Vec<ConstraintSpec>> {
    let specs = match file {
        Some(path) => schema::load_schema_file(path)?,
        None => schema::campus_constraints()?,
    };
    Ok(specs)
}

/// Apply the schema.
async fn cmd_apply(connection: &ConnectionArgs, file: Option<&Path>, json: bool) -> Result<()> {
    let applier = SchemaApplier::new(load_specs(file)?)?;
    let config = connection.resolve()?;
    debug!(?config, constraints = applier.specs().len(), "Resolved schema apply");

    if !json {
        println!("{} {}", "Applying schema to".bold(), config.uri.cyan());
    }

    let client = super::connect(&config).await?;
    let count = applier.apply(&client).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output::applied_json(&count))?);
    } else {
        output::print_applied(&count);
    }

    Ok(())
}

/// Print the statements a schema would issue.
fn cmd_plan(file: Option<&Path>) -> Result<()> {
    let specs = load_specs(file)?;
    output::print_plan(&specs);
    Ok(())
}

/// Show the database's constraint catalog.
async fn cmd_status(connection: &ConnectionArgs, json: bool) -> Result<()> {
    let config = connection.resolve()?;
    debug!(?config, "Reading constraint catalog");
    let client = super::connect(&config).await?;
    let constraints = client.constraints().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&constraints)?);
    } else {
        output::print_constraints_table(&constraints);
    }

    Ok(())
}
