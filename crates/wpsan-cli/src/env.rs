//! `.env` facility for the production guard.
//!
//! The facility exists only when the install ships an env file. Values set in
//! the process environment win over the file, the same way the install's own
//! `env()` helper resolves them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wpsan_core::Environment;

/// Variables parsed from an install's `.env` file.
#[derive(Debug, Clone)]
pub struct DotEnv {
    path: PathBuf,
    vars: HashMap<String, String>,
}

impl DotEnv {
    /// Load `path` if it exists. `Ok(None)` means the facility is unavailable.
    pub fn discover(path: &Path) -> Result<Option<Self>, dotenvy::Error> {
        if !path.is_file() {
            return Ok(None);
        }

        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        tracing::debug!(path = %path.display(), vars = vars.len(), "loaded env file");

        Ok(Some(Self {
            path: path.to_path_buf(),
            vars,
        }))
    }

    /// The file the variables came from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DotEnv {
    /// `process` is the value from the process environment, if any.
    fn resolve(&self, key: &str, process: Option<String>) -> Option<String> {
        process.or_else(|| self.vars.get(key).cloned())
    }
}

impl Environment for DotEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.resolve(key, std::env::var(key).ok())
    }
}
