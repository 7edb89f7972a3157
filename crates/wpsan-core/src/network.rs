//! Network-level account removal for multisite installs.

use tracing::{debug, warn};

use crate::deleter::Outcome;
use crate::platform::Platform;
use crate::reporter::Reporter;
use crate::types::{Site, User};

/// Deletes accounts that are administrator on no site of the network.
///
/// Runs once, after every site has been purged, so that per-site content has
/// already been handed to an administrator.
pub struct NetworkUserSanitizer<'a> {
    reporter: &'a dyn Reporter,
}

impl std::fmt::Debug for NetworkUserSanitizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkUserSanitizer").finish_non_exhaustive()
    }
}

impl<'a> NetworkUserSanitizer<'a> {
    /// Create a sanitizer reporting to `reporter`.
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Delete every network account without administrator rights anywhere.
    pub fn delete_network_users(&self, platform: &mut dyn Platform, origin: &Site) -> Outcome {
        let users = match platform.network_users(origin) {
            Ok(users) => users,
            Err(e) => {
                let msg = format!("Could not list network users: {e}");
                self.reporter.error(&msg);
                return Outcome::Failed(msg);
            }
        };

        let targets: Vec<&User> = users.iter().filter(|u| !u.is_administrator()).collect();
        if targets.is_empty() {
            self.reporter
                .success("All non-admin network users already deleted");
            return Outcome::AlreadyClean;
        }

        let mut deleted = 0;
        for user in &targets {
            match platform.delete_network_user(origin, user.id) {
                Ok(true) => {
                    debug!(user = %user.id, login = %user.login, "deleted network user");
                    deleted += 1;
                }
                Ok(false) => warn!(user = %user.id, "network user was not removed"),
                Err(e) => warn!(user = %user.id, "failed to delete network user: {e}"),
            }
        }

        let outcome = Outcome::tally(deleted, targets.len());
        let msg = match outcome {
            Outcome::Partial { deleted, targeted } => {
                format!("Deleted {deleted} of {targeted} non-admin network users")
            }
            _ => format!("Deleted {deleted} non-admin network users"),
        };
        self.reporter.status(outcome.severity(), &msg);
        outcome
    }
}
