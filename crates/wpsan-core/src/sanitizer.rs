//! The guarded purge command.

use std::fmt;

use crate::deleter::{Outcome, SiteDeleter, SiteReport};
use crate::error::SanitizeError;
use crate::exemption::ExemptionPolicy;
use crate::guard::{self, Environment, Prompter};
use crate::mail::{self, BLACKHOLE, REDACT_PRIORITY};
use crate::network::NetworkUserSanitizer;
use crate::platform::Platform;
use crate::reporter::Reporter;
use crate::tenancy::TenancyIterator;
use crate::types::Site;

/// Shown on multisite when exemptions beyond administrators are configured.
pub const NETWORK_EXEMPTION_WARNING: &str = "Exempt roles only protect site memberships; network accounts without an administrator role on any site are still deleted";

/// How the install was purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tenancy {
    /// One site, purged in place.
    Single,
    /// Every site of a network, then the network accounts.
    Multi,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Tenancy mode detected.
    pub tenancy: Tenancy,
    /// Site current at invocation; the network step ran from it.
    pub origin: Site,
    /// Per-site reports in processing order.
    pub sites: Vec<SiteReport>,
    /// Network account removal, multisite only.
    pub network: Option<Outcome>,
}

impl RunSummary {
    /// Whether any step ended with an error status.
    pub fn has_errors(&self) -> bool {
        let site_errors = self.sites.iter().any(|r| {
            [&r.users, &r.comments, &r.form_entries, &r.orders]
                .into_iter()
                .any(|o| o.severity() == crate::Severity::Error)
        });
        site_errors
            || self
                .network
                .as_ref()
                .is_some_and(|o| o.severity() == crate::Severity::Error)
    }
}

/// Entry point of the purge: guards, mail redaction, then the tenancy-specific pass.
pub struct Sanitizer<'a> {
    policy: ExemptionPolicy,
    reporter: &'a dyn Reporter,
    prompter: &'a dyn Prompter,
    environment: Option<&'a dyn Environment>,
}

impl fmt::Debug for Sanitizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("policy", &self.policy)
            .field("environment", &self.environment.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> Sanitizer<'a> {
    /// A sanitizer with no environment facility and the default exemption policy.
    pub fn new(reporter: &'a dyn Reporter, prompter: &'a dyn Prompter) -> Self {
        Self {
            policy: ExemptionPolicy::default(),
            reporter,
            prompter,
            environment: None,
        }
    }

    /// Read `ENVIRONMENT` from `environment` instead of asking the operator.
    pub fn with_environment(mut self, environment: &'a dyn Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Replace the exemption policy.
    pub fn with_policy(mut self, policy: ExemptionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the purge.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::Production`] or [`SanitizeError::Declined`]
    /// before any store access when a guard trips, and
    /// [`SanitizeError::Store`] when the install's tenancy cannot be read.
    /// Failures inside individual steps are reported, not returned.
    pub fn run(&self, platform: &mut dyn Platform) -> Result<RunSummary, SanitizeError> {
        guard::check_environment(self.environment, self.prompter)?;
        guard::confirm_destruction(self.prompter)?;

        self.reporter.warning(&format!(
            "Any email notifications will be sent to {BLACKHOLE} during this process"
        ));
        platform
            .mail_hooks()
            .add_filter(REDACT_PRIORITY, mail::redact_recipient);

        let deleter = SiteDeleter::new(&self.policy, self.reporter);

        if !platform.is_multisite()? {
            let origin = platform.current_site()?;
            let report = deleter.delete_all(platform, &origin);
            return Ok(RunSummary {
                tenancy: Tenancy::Single,
                origin,
                sites: vec![report],
                network: None,
            });
        }

        let pass = TenancyIterator::new(&deleter, self.reporter).run(platform)?;

        if self.policy.is_widened() {
            self.reporter.warning(NETWORK_EXEMPTION_WARNING);
        }

        self.reporter
            .log("---- Start Non-Admin Network User Sanitization");
        let network =
            NetworkUserSanitizer::new(self.reporter).delete_network_users(platform, &pass.origin);
        self.reporter.log("---- End Non-Admin Network User Sanitization");

        Ok(RunSummary {
            tenancy: Tenancy::Multi,
            origin: pass.origin,
            sites: pass.reports,
            network: Some(network),
        })
    }
}
