//! Per-site purge
//!
//! [`SiteDeleter`] runs the four purge steps against one site in a fixed
//! order: users, comments, form entries, orders. Each step is bracketed by
//! start/end log lines and ends with exactly one status line. A failing
//! step never stops the ones after it.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::exemption::ExemptionPolicy;
use crate::platform::Platform;
use crate::reporter::{Reporter, Severity};
use crate::types::{FormListing, Plugin, Purge, Site, User};

/// Result of one purge step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every targeted record was deleted; carries how many.
    Deleted(usize),
    /// Some targeted records could not be deleted.
    Partial {
        /// Records deleted.
        deleted: usize,
        /// Records targeted.
        targeted: usize,
    },
    /// Nothing left to delete.
    AlreadyClean,
    /// Bulk purge issued; rows are not counted.
    Purged,
    /// No administrator exists to inherit content, so no user was touched.
    NoAdministrator,
    /// The plugin owning the data is not active.
    Skipped(Plugin),
    /// The store failed before the step could finish.
    Failed(String),
}

impl Outcome {
    /// Severity of the status line this outcome is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Deleted(_) | Self::AlreadyClean | Self::Purged => Severity::Success,
            Self::Skipped(_) => Severity::Warning,
            Self::Partial { .. } | Self::NoAdministrator | Self::Failed(_) => Severity::Error,
        }
    }

    /// Account for a loop of individual deletions.
    pub fn tally(deleted: usize, targeted: usize) -> Self {
        if deleted == targeted {
            Self::Deleted(deleted)
        } else {
            Self::Partial { deleted, targeted }
        }
    }
}

/// Outcomes of the four steps on one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteReport {
    /// The site purged.
    pub site: Site,
    /// Non-admin user deletion.
    pub users: Outcome,
    /// Comment purge.
    pub comments: Outcome,
    /// Gravity Forms entry deletion.
    pub form_entries: Outcome,
    /// WooCommerce order purge.
    pub orders: Outcome,
}

/// Runs the purge steps against a single site.
pub struct SiteDeleter<'a> {
    policy: &'a ExemptionPolicy,
    reporter: &'a dyn Reporter,
}

impl fmt::Debug for SiteDeleter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteDeleter")
            .field("policy", self.policy)
            .finish_non_exhaustive()
    }
}

impl<'a> SiteDeleter<'a> {
    /// Create a deleter that protects users matching `policy`.
    pub fn new(policy: &'a ExemptionPolicy, reporter: &'a dyn Reporter) -> Self {
        Self { policy, reporter }
    }

    /// Run all four steps in order.
    pub fn delete_all(&self, platform: &mut dyn Platform, site: &Site) -> SiteReport {
        let users = self.phase("Non-Admin User", || self.delete_users(platform, site));
        let comments = self.phase("Comment", || self.delete_comments(platform, site));
        let form_entries = self.phase("Gravity Forms", || self.delete_form_entries(platform, site));
        let orders = self.phase("WooCommerce", || self.delete_orders(platform, site));

        SiteReport {
            site: site.clone(),
            users,
            comments,
            form_entries,
            orders,
        }
    }

    /// Delete every non-exempt member of `site`, reassigning content to the first administrator.
    pub fn delete_users(&self, platform: &mut dyn Platform, site: &Site) -> Outcome {
        let users = match platform.users(site) {
            Ok(users) => users,
            Err(e) => return self.fail("Could not list users", &e),
        };

        let Some(heir) = users.iter().find(|u| u.is_administrator()).map(|u| u.id) else {
            self.reporter
                .error("Can't proceed there are no admin users to re-assign content to");
            return Outcome::NoAdministrator;
        };

        let targets: Vec<&User> = users.iter().filter(|u| !self.policy.is_exempt(u)).collect();
        if targets.is_empty() {
            self.reporter.success("All non-admin users already deleted");
            return Outcome::AlreadyClean;
        }

        let mut deleted = 0;
        for user in &targets {
            match platform.delete_user(site, user.id, heir) {
                Ok(true) => {
                    debug!(site = %site.id, user = %user.id, login = %user.login, "deleted user");
                    deleted += 1;
                }
                Ok(false) => warn!(site = %site.id, user = %user.id, "user was not removed"),
                Err(e) => warn!(site = %site.id, user = %user.id, "failed to delete user: {e}"),
            }
        }

        let outcome = Outcome::tally(deleted, targets.len());
        let msg = match outcome {
            Outcome::Partial { deleted, targeted } => {
                format!("Deleted {deleted} of {targeted} non-admin users")
            }
            _ => format!("Deleted {deleted} non-admin users"),
        };
        self.reporter.status(outcome.severity(), &msg);
        outcome
    }

    /// Purge all comments and their metadata.
    pub fn delete_comments(&self, platform: &mut dyn Platform, site: &Site) -> Outcome {
        match self.purge(platform, site, &Purge::COMMENTS) {
            Ok(()) => {
                self.reporter.success("Comments deleted");
                Outcome::Purged
            }
            Err(e) => self.fail("Could not delete comments", &e),
        }
    }

    /// Delete the entries of every Gravity Forms form, each form at most once.
    pub fn delete_form_entries(&self, platform: &mut dyn Platform, site: &Site) -> Outcome {
        match self.plugin_active(platform, site, Plugin::GravityForms) {
            Ok(true) => {}
            Ok(false) => return Outcome::Skipped(Plugin::GravityForms),
            Err(e) => return self.fail("Could not check Gravity Forms", &e),
        }

        let mut forms = BTreeSet::new();
        for listing in FormListing::ALL {
            match platform.forms(site, listing) {
                Ok(ids) => forms.extend(ids),
                Err(e) => return self.fail("Could not list Gravity Forms forms", &e),
            }
        }

        self.reporter
            .log(&format!("{} forms to delete entries from", forms.len()));

        let mut cleared = 0;
        for form in &forms {
            match platform.delete_form_entries(site, *form) {
                Ok(entries) => {
                    debug!(site = %site.id, form = %form, entries, "deleted form entries");
                    cleared += 1;
                }
                Err(e) => warn!(site = %site.id, form = %form, "failed to delete form entries: {e}"),
            }
        }

        let outcome = Outcome::tally(cleared, forms.len());
        match outcome {
            Outcome::Partial { deleted, targeted } => self.reporter.error(&format!(
                "Deleted entries from {deleted} of {targeted} Gravity Forms forms"
            )),
            _ => self.reporter.success("Deleted all Gravity Forms entries"),
        }
        outcome
    }

    /// Purge WooCommerce orders, dependents first.
    ///
    /// Order notes are comments and went with [`Self::delete_comments`].
    pub fn delete_orders(&self, platform: &mut dyn Platform, site: &Site) -> Outcome {
        match self.plugin_active(platform, site, Plugin::WooCommerce) {
            Ok(true) => {}
            Ok(false) => return Outcome::Skipped(Plugin::WooCommerce),
            Err(e) => return self.fail("Could not check WooCommerce", &e),
        }

        match self.purge(platform, site, &Purge::ORDERS) {
            Ok(()) => {
                self.reporter.success("WooCommerce orders deleted");
                Outcome::Purged
            }
            Err(e) => self.fail("Could not delete WooCommerce orders", &e),
        }
    }

    fn phase<T>(&self, name: &str, step: impl FnOnce() -> T) -> T {
        self.reporter.log(&format!("---- Start {name} Sanitization"));
        let result = step();
        self.reporter.log(&format!("---- End {name} Sanitization"));
        result
    }

    // Stops at the first failure so dependents are never orphaned out of order.
    fn purge(
        &self,
        platform: &mut dyn Platform,
        site: &Site,
        targets: &[Purge],
    ) -> Result<(), StoreError> {
        for target in targets {
            let rows = platform.purge(site, *target)?;
            debug!(site = %site.id, ?target, rows, "purged");
        }
        Ok(())
    }

    fn plugin_active(
        &self,
        platform: &dyn Platform,
        site: &Site,
        plugin: Plugin,
    ) -> Result<bool, StoreError> {
        let active = platform.is_plugin_active(site, plugin)?;
        if !active {
            self.reporter
                .warning(&format!("{plugin} is not installed or not activated"));
        }
        Ok(active)
    }

    fn fail(&self, what: &str, err: &StoreError) -> Outcome {
        let msg = format!("{what}: {err}");
        self.reporter.error(&msg);
        Outcome::Failed(msg)
    }
}
