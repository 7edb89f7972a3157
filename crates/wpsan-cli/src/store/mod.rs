//! WordPress database access

pub mod db;
pub mod php;

#[cfg(test)]
pub(crate) mod fixture;

pub use db::{DbError, WpStore};
