//! Reporter trait for dependency injection
//!
//! This trait allows the purge logic to report progress and status without
//! being coupled to a specific terminal implementation.

/// Classification of a terminal status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The step did what it was asked to.
    Success,
    /// The step was skipped because an optional dependency is absent.
    Warning,
    /// The step failed or was only partly carried out.
    Error,
}

/// Operator-facing output of a run.
pub trait Reporter: Send + Sync {
    /// Log a plain progress line (phase brackets, counts).
    fn log(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);

    /// Emit a status line with the given severity.
    fn status(&self, severity: Severity, msg: &str) {
        match severity {
            Severity::Success => self.success(msg),
            Severity::Warning => self.warning(msg),
            Severity::Error => self.error(msg),
        }
    }
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn log(&self, msg: &str) {
        (**self).log(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn log(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
