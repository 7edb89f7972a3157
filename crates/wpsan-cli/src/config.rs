//! Configuration
//!
//! Settings come from three layers, highest first: command-line flags (or
//! their `WPSAN_*` environment variables), the `wpsan.toml` file, and
//! built-in defaults.
//!
//! ```toml
//! [database]
//! path = "wp-content/database/.ht.sqlite"
//! table_prefix = "wp_"
//!
//! [network]
//! multisite = true   # omit to detect from the schema
//! site_id = 1        # site the command runs from
//!
//! [sanitize]
//! exempt_roles = ["editor"]
//! env_file = ".env"
//! ```
//!
//! On multisite, `exempt_roles` only protects site memberships. The network
//! step still deletes every account that is not an administrator on some
//! site, and the run warns about it.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use wpsan_core::{Role, SiteId};

use crate::InstallArgs;

/// Config file looked up in the install directory.
pub const CONFIG_FILE: &str = "wpsan.toml";

/// Where the SQLite Database Integration plugin keeps the database.
pub const DEFAULT_DB: &str = "wp-content/database/.ht.sqlite";

/// WordPress' default `$table_prefix`.
pub const DEFAULT_PREFIX: &str = "wp_";

/// Environment file read by the production guard.
pub const DEFAULT_ENV_FILE: &str = ".env";

// Table names are interpolated into SQL, so the prefix must stay an identifier.
static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid prefix pattern"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid table prefix '{0}': only letters, digits and underscores are allowed")]
    InvalidPrefix(String),

    #[error("Invalid site id 0: blog ids start at 1")]
    InvalidSiteId,
}

/// Contents of `wpsan.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: DatabaseSection,
    pub network: NetworkSection,
    pub sanitize: SanitizeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub path: Option<PathBuf>,
    pub table_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSection {
    pub multisite: Option<bool>,
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizeSection {
    /// Roles protected in addition to `administrator`. Multisite network
    /// accounts are not covered.
    pub exempt_roles: Vec<String>,
    pub env_file: Option<PathBuf>,
}

impl FileConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// WordPress install directory.
    pub root: PathBuf,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Base table prefix.
    pub table_prefix: String,
    /// Forced tenancy mode; `None` detects it from the schema.
    pub multisite: Option<bool>,
    /// Site the command runs from.
    pub site_id: SiteId,
    /// Extra exempt roles.
    pub exempt_roles: Vec<Role>,
    /// `.env` file consulted by the production guard.
    pub env_file: PathBuf,
}

impl Settings {
    /// Resolve settings from command-line arguments and the config file.
    ///
    /// An explicit `--config` must exist; the implicit `wpsan.toml` is optional.
    pub fn resolve(args: &InstallArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let implicit = args.path.join(CONFIG_FILE);
                if implicit.is_file() {
                    FileConfig::load(&implicit)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(args, file)
    }

    fn merge(args: &InstallArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let root = args.path.clone();

        let db_path = args
            .db
            .clone()
            .or(file.database.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        let table_prefix = args
            .prefix
            .clone()
            .or(file.database.table_prefix)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if !PREFIX_RE.is_match(&table_prefix) {
            return Err(ConfigError::InvalidPrefix(table_prefix));
        }

        let site_id = match file.network.site_id {
            Some(0) => return Err(ConfigError::InvalidSiteId),
            Some(id) => SiteId(id),
            None => SiteId::MAIN,
        };

        let env_file = file
            .sanitize
            .env_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));

        Ok(Self {
            db_path: root.join(db_path),
            env_file: root.join(env_file),
            root,
            table_prefix,
            multisite: file.network.multisite,
            site_id,
            exempt_roles: file
                .sanitize
                .exempt_roles
                .into_iter()
                .map(Role::new)
                .collect(),
        })
    }
}
