//! Pre-flight checks that gate every destructive step.

use crate::error::SanitizeError;

/// Variable that names the deployment environment.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Value of [`ENVIRONMENT_VAR`] that forbids the run. Compared case-sensitively.
pub const PRODUCTION: &str = "production";

/// Asked when no environment facility is available.
pub const STAGING_PROMPT: &str = "Are you running this command on staging or local?";

/// Asked before anything is deleted.
pub const DESTRUCTIVE_PROMPT: &str = "Are you sure want to delete all non-admin WordPress users, Gravity Form entries (if installed) and WooCommerce orders (if installed)?";

/// Source of environment variables such as a project `.env` file.
pub trait Environment {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Interactive yes/no questions.
pub trait Prompter {
    /// Ask `question`; `Ok(true)` only on an explicit yes.
    ///
    /// # Errors
    ///
    /// Fails when the answer cannot be read.
    fn confirm(&self, question: &str) -> std::io::Result<bool>;
}

/// Refuse production, or make the operator vouch for the environment when it cannot be read.
///
/// # Errors
///
/// [`SanitizeError::Production`] when `ENVIRONMENT` is `production`,
/// [`SanitizeError::Declined`] when the operator does not confirm the staging
/// question, and [`SanitizeError::Prompt`] when the answer cannot be read.
pub fn check_environment(
    environment: Option<&dyn Environment>,
    prompter: &dyn Prompter,
) -> Result<(), SanitizeError> {
    match environment {
        Some(env) => {
            if env.var(ENVIRONMENT_VAR).as_deref() == Some(PRODUCTION) {
                return Err(SanitizeError::Production);
            }
            Ok(())
        }
        None => confirm(prompter, STAGING_PROMPT),
    }
}

/// Make the operator confirm the scope of the purge.
///
/// # Errors
///
/// [`SanitizeError::Declined`] unless the operator answers yes, and
/// [`SanitizeError::Prompt`] when the answer cannot be read.
pub fn confirm_destruction(prompter: &dyn Prompter) -> Result<(), SanitizeError> {
    confirm(prompter, DESTRUCTIVE_PROMPT)
}

fn confirm(prompter: &dyn Prompter, question: &str) -> Result<(), SanitizeError> {
    if prompter.confirm(question)? {
        Ok(())
    } else {
        Err(SanitizeError::Declined(question.to_string()))
    }
}
