//! wpsan core - guarded GDPR purge of WordPress installs
//!
//! The crate holds every decision the purge makes and none of the I/O.
//! The host install is reached through [`Platform`], the operator through
//! [`Reporter`] and [`Prompter`], and the optional `.env` facility through
//! [`Environment`].
//!
//! # Flow
//!
//! ```text
//! Sanitizer::run
//!   ├── environment guard / confirmations   (abort: no store access)
//!   ├── outbound mail redaction             (MailHooks)
//!   ├── single site ── SiteDeleter::delete_all
//!   └── multisite  ── TenancyIterator ── SiteDeleter::delete_all (per site)
//!                     └── NetworkUserSanitizer::delete_network_users
//! ```

pub mod deleter;
pub mod error;
pub mod exemption;
pub mod guard;
pub mod mail;
pub mod network;
pub mod platform;
pub mod reporter;
pub mod sanitizer;
pub mod tenancy;
pub mod types;

#[cfg(test)]
mod testing;

pub use deleter::{Outcome, SiteDeleter, SiteReport};
pub use error::{SanitizeError, StoreError};
pub use exemption::ExemptionPolicy;
pub use guard::{Environment, Prompter};
pub use mail::{BLACKHOLE, Mail, MailHooks};
pub use network::NetworkUserSanitizer;
pub use platform::Platform;
pub use reporter::{NullReporter, Reporter, Severity};
pub use sanitizer::{RunSummary, Sanitizer, Tenancy};
pub use tenancy::TenancyIterator;
pub use types::{FormId, FormListing, Plugin, Purge, Role, Site, SiteId, User, UserId};
