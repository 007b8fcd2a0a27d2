//! Campus CLI - course catalog graph schema tooling.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing on stderr so command output on stdout stays clean.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` switches to debug.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "campus=debug,campus_graph=debug"
    } else {
        "campus=info,campus_graph=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cli.execute().await
}
