//! Error types for platform access and the guarded run

use thiserror::Error;

/// Failure reported by a [`Platform`](crate::Platform) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database rejected a statement.
    #[error("{context}: {source}")]
    Backend {
        /// What the store was doing.
        context: &'static str,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A site handle does not name a site of this install.
    #[error("Unknown site: {0}")]
    UnknownSite(u64),

    /// The install is missing a table the operation needs.
    #[error("Missing table: {0}")]
    MissingTable(String),
}

impl StoreError {
    /// Wrap a backend error with context for better debugging.
    pub fn backend(
        context: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            context,
            source: Box::new(source),
        }
    }
}

/// Reasons a run stops before, or instead of, purging anything per site.
#[derive(Error, Debug)]
pub enum SanitizeError {
    /// `ENVIRONMENT` is `production`.
    #[error("Sorry I will not run if your .env file is set to production.")]
    Production,

    /// The operator answered no to a confirmation prompt.
    #[error("Aborted: {0}")]
    Declined(String),

    /// The prompt could not read the operator's answer.
    #[error("Prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    /// Tenancy discovery failed, so there is nothing safe to iterate.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SanitizeError {
    /// Whether the run stopped before touching the store.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Production | Self::Declined(_) | Self::Prompt(_))
    }
}
