//! The host install as seen by the sanitizer.

use crate::error::StoreError;
use crate::mail::MailHooks;
use crate::types::{FormId, FormListing, Plugin, Purge, Site, User, UserId};

/// Storage boundary of a WordPress install.
///
/// Read methods take `&self`; anything that removes rows takes `&mut self`.
/// Per-site methods act on the site handle they are given and nothing else.
pub trait Platform {
    /// Whether the install is a multisite network.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn is_multisite(&self) -> Result<bool, StoreError>;

    /// The site the command was invoked against.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSite`] when the configured site does not exist.
    fn current_site(&self) -> Result<Site, StoreError>;

    /// Up to `limit` sites of the network, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn sites(&self, limit: usize) -> Result<Vec<Site>, StoreError>;

    /// Members of `site` with their roles on that site, ordered by login.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn users(&self, site: &Site) -> Result<Vec<User>, StoreError>;

    /// Remove `user` from `site`, handing its content to `reassign`.
    ///
    /// Returns `false` when the user was not a member (nothing removed).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn delete_user(&mut self, site: &Site, user: UserId, reassign: UserId)
    -> Result<bool, StoreError>;

    /// Bulk delete one table's worth of rows on `site`. Returns rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingTable`] when the install lacks the target table.
    fn purge(&mut self, site: &Site, target: Purge) -> Result<u64, StoreError>;

    /// Whether `plugin` is active on `site`, either per site or network-wide.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn is_plugin_active(&self, site: &Site, plugin: Plugin) -> Result<bool, StoreError>;

    /// Form ids of one listing on `site`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn forms(&self, site: &Site, listing: FormListing) -> Result<Vec<FormId>, StoreError>;

    /// Delete every entry of `form` together with its meta and notes. Returns entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn delete_form_entries(&mut self, site: &Site, form: FormId) -> Result<u64, StoreError>;

    /// Every network account with the union of its roles over all sites.
    ///
    /// `site` is the site the network step runs from.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn network_users(&self, site: &Site) -> Result<Vec<User>, StoreError>;

    /// Delete an account from the whole network.
    ///
    /// Returns `false` when the account did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read or written.
    fn delete_network_user(&mut self, site: &Site, user: UserId) -> Result<bool, StoreError>;

    /// Filters applied to every notification the install sends.
    fn mail_hooks(&mut self) -> &mut MailHooks;
}
