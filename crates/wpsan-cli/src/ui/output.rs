//! Operator-facing status lines.
//!
//! Progress lines go to stdout; warnings and errors go to stderr so they
//! survive `> report.txt`.

use std::io::Write;

use crossterm::style::Stylize;
use wpsan_core::{Reporter, Severity};

use super::theme::Theme;

/// Renders status lines for the operator.
#[derive(Debug, Clone, Default)]
pub struct Output {
    theme: Theme,
}

impl Output {
    /// Create a new output handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints an informational message with the info icon.
    pub fn info(&self, msg: &str) {
        let mark = self.theme.info;
        println!("{} {msg}", mark.icon.with(mark.color));
    }

    fn line(&self, severity: Severity, msg: &str) {
        let mark = self.theme.mark(severity);
        let rendered = format!("{} {}", mark.icon.with(mark.color), msg.with(mark.color));
        match severity {
            Severity::Success => println!("{rendered}"),
            Severity::Warning | Severity::Error => {
                let _ = std::io::stdout().flush();
                eprintln!("{rendered}");
            }
        }
    }
}

impl Reporter for Output {
    fn log(&self, msg: &str) {
        if msg.starts_with("----") {
            println!("{}", msg.with(self.theme.bracket));
        } else {
            println!("{msg}");
        }
    }

    fn success(&self, msg: &str) {
        self.line(Severity::Success, msg);
    }

    fn warning(&self, msg: &str) {
        self.line(Severity::Warning, msg);
    }

    fn error(&self, msg: &str) {
        self.line(Severity::Error, msg);
    }
}
