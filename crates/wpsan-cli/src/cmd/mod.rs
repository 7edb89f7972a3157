//! Command modules - one file per CLI command

pub mod completions;
pub mod sanitize;
