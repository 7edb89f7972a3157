//! wpsan - GDPR sanitization for WordPress databases

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wpsan_cli::cmd;
use wpsan_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the operator-facing report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GdprSanitize => cmd::sanitize::gdpr_sanitize(&cli.install),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
