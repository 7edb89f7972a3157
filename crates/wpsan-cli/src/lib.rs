//! wpsan - GDPR sanitization for WordPress databases
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Removes regulated personal data from a copy of a WordPress install before
//! it is handed to developers: non-admin accounts, comments, Gravity Forms
//! entries and WooCommerce orders.
//!
//! # Architecture
//!
//! - **Core/CLI split**: every purge decision lives in `wpsan-core`; this crate
//!   only supplies the collaborators it asks for.
//! - **Store**: `WpStore` implements `Platform` directly on the WordPress tables
//!   of a SQLite database (`wp-content/database/.ht.sqlite`).
//! - **Operator I/O**: `Output` renders status lines, `LinePrompt` asks the
//!   confirmation questions, `DotEnv` is the optional `.env` facility.
//!
//! # Install Layout
//!
//! ```text
//! <path>/
//! ├── .env                              # optional, ENVIRONMENT=staging
//! ├── wpsan.toml                        # optional configuration
//! └── wp-content/database/.ht.sqlite    # WordPress database
//! ```

pub mod cmd;
pub mod config;
pub mod env;
pub mod store;
pub mod ui;

pub use crate::config::Settings;
pub use crate::env::DotEnv;
pub use crate::store::WpStore;
pub use crate::ui::{LinePrompt, Output};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Version reported by `--version`, derived from git tags at build time.
pub const VERSION: &str = env!("WPSAN_VERSION");

#[derive(Debug, Parser)]
#[command(name = "wpsan")]
#[command(author, version = VERSION, about = "wpsan - GDPR sanitization for WordPress databases")]
pub struct Cli {
    #[command(flatten)]
    pub install: InstallArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the WordPress install lives. Shared by every command.
#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    /// WordPress install directory
    #[arg(long, global = true, env = "WPSAN_PATH", default_value = ".")]
    pub path: PathBuf,

    /// SQLite database file (default: wp-content/database/.ht.sqlite)
    #[arg(long, global = true, env = "WPSAN_DB")]
    pub db: Option<PathBuf>,

    /// Database table prefix (default: wp_)
    #[arg(long, global = true, env = "WPSAN_TABLE_PREFIX")]
    pub prefix: Option<String>,

    /// Configuration file (default: <path>/wpsan.toml)
    #[arg(long, global = true, env = "WPSAN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Delete non-admin users, comments, Gravity Forms entries and WooCommerce orders
    #[command(name = "gdpr-sanitize")]
    GdprSanitize,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
