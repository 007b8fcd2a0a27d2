//! Connectivity check.

use anyhow::Result;
use colored::Colorize;

use super::ConnectionArgs;

pub async fn execute(connection: &ConnectionArgs) -> Result<()> {
    let config = connection.resolve()?;
    print!("  {:<10} ", "neo4j");

    match super::connect(&config).await {
        Ok(_) => {
            println!("{} ({})", "ok".green(), config.uri.dimmed());
            Ok(())
        }
        Err(e) => {
            println!("{}", "down".red());
            Err(e.into())
        }
    }
}
