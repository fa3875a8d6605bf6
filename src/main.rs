//! CPU segment - Main Entry Point
//!
//! Builds numeric feature matrices from processor specification tables.

use clap::Parser;
use cpu_segment::cli::{cmd_apply, cmd_build, cmd_info, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpu_segment=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data, schema, output, params, buckets, unknown } => {
            cmd_build(&data, schema.as_deref(), &output, params.as_deref(), buckets, &unknown)?;
        }
        Commands::Apply { data, params, schema, output, unknown } => {
            cmd_apply(&data, &params, schema.as_deref(), &output, &unknown)?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
