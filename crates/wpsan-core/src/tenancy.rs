//! Multisite iteration

use crate::deleter::{SiteDeleter, SiteReport};
use crate::error::StoreError;
use crate::platform::Platform;
use crate::reporter::Reporter;
use crate::types::Site;

/// Page size used to list "all" sites in one request.
pub const SITE_LIST_LIMIT: usize = 9_999_999;

/// Sites visited by one multisite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyRun {
    /// The site that was current before the pass; later network-level work runs from it.
    pub origin: Site,
    /// One report per site, in listing order.
    pub reports: Vec<SiteReport>,
}

/// Runs a [`SiteDeleter`] over every site of a network.
///
/// The site list is a snapshot taken once; sites created mid-run are not visited.
pub struct TenancyIterator<'a> {
    deleter: &'a SiteDeleter<'a>,
    reporter: &'a dyn Reporter,
}

impl std::fmt::Debug for TenancyIterator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenancyIterator")
            .field("deleter", self.deleter)
            .finish_non_exhaustive()
    }
}

impl<'a> TenancyIterator<'a> {
    /// Create an iterator driving `deleter`.
    pub fn new(deleter: &'a SiteDeleter<'a>, reporter: &'a dyn Reporter) -> Self {
        Self { deleter, reporter }
    }

    /// Purge every site in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the origin site or the site list cannot be
    /// read. Failures inside a site's purge are reported and recorded in its
    /// [`SiteReport`] instead.
    pub fn run(&self, platform: &mut dyn Platform) -> Result<TenancyRun, StoreError> {
        let origin = platform.current_site()?;
        let sites = platform.sites(SITE_LIST_LIMIT)?;
        tracing::debug!(origin = %origin.id, sites = sites.len(), "starting multisite pass");

        let mut reports = Vec::with_capacity(sites.len());
        for site in &sites {
            self.reporter
                .warning(&format!("Starting deletion for site {}", site.domain));
            reports.push(self.deleter.delete_all(platform, site));
        }

        Ok(TenancyRun { origin, reports })
    }
}
