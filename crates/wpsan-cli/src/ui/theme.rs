//! Icons and colors for status lines.

use crossterm::style::Color;
use wpsan_core::Severity;

/// How one kind of status line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub icon: &'static str,
    pub color: Color,
}

impl Mark {
    const fn new(icon: &'static str, color: Color) -> Self {
        Self { icon, color }
    }
}

/// Styles used by [`Output`](super::Output).
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Mark,
    pub warning: Mark,
    pub error: Mark,
    pub info: Mark,
    /// Phase brackets (`---- Start ...`).
    pub bracket: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Mark::new("✓", Color::Green),
            warning: Mark::new("⚠", Color::Yellow),
            error: Mark::new("✗", Color::Red),
            info: Mark::new("ℹ", Color::Blue),
            bracket: Color::DarkGrey,
        }
    }
}

impl Theme {
    pub fn mark(&self, severity: Severity) -> Mark {
        match severity {
            Severity::Success => self.success,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}
