//! Terminal output and prompts

pub mod output;
pub mod prompt;
pub mod theme;

pub use output::Output;
pub use prompt::LinePrompt;
pub use theme::Theme;
