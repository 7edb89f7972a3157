//! SQLite WordPress store
//!
//! Implements [`Platform`] on the WordPress tables of a SQLite database.
//! Table names follow WordPress' prefix scheme: the main site and all
//! network tables use the base prefix (`wp_`), site N uses `wp_N_`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use thiserror::Error;
use tracing::debug;
use wpsan_core::{
    FormId, FormListing, MailHooks, Platform, Plugin, Purge, Role, Site, SiteId, StoreError, User,
    UserId,
};

use super::php;
use crate::config::Settings;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{path} has no {table} table; is the table prefix right?")]
    NotWordPress { path: String, table: String },
}

/// Post type WooCommerce stores orders under.
const ORDER_POST_TYPE: &str = "shop_order";

/// Database of one WordPress install.
pub struct WpStore {
    conn: Connection,
    prefix: String,
    multisite: bool,
    current: SiteId,
    /// Outbound mail filters, see [`Platform::mail_hooks`].
    hooks: MailHooks,
}

impl fmt::Debug for WpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WpStore")
            .field("prefix", &self.prefix)
            .field("multisite", &self.multisite)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

fn db(context: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |e| StoreError::backend(context, e)
}

impl WpStore {
    /// Open the install described by `settings`.
    pub fn open(settings: &Settings) -> Result<Self, DbError> {
        let store = Self::open_at(&settings.db_path, &settings.table_prefix, settings.multisite)?;
        Ok(store.with_current_site(settings.site_id))
    }

    /// Open an existing database. Never creates one.
    ///
    /// `multisite` forces the tenancy mode; `None` detects it from the
    /// presence of the network `blogs` table. `prefix` must already be
    /// validated as an identifier.
    pub fn open_at(path: &Path, prefix: &str, multisite: Option<bool>) -> Result<Self, DbError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let users = format!("{prefix}users");
        if !table_exists(&conn, &users)? {
            return Err(DbError::NotWordPress {
                path: path.display().to_string(),
                table: users,
            });
        }

        let multisite = match multisite {
            Some(forced) => forced,
            None => table_exists(&conn, &format!("{prefix}blogs"))?,
        };
        debug!(path = %path.display(), prefix, multisite, "opened WordPress database");

        Ok(Self {
            conn,
            prefix: prefix.to_string(),
            multisite,
            current: SiteId::MAIN,
            hooks: MailHooks::new(),
        })
    }

    /// Run from `site` instead of the main site.
    pub fn with_current_site(mut self, site: SiteId) -> Self {
        self.current = site;
        self
    }

    /// Base-prefixed table shared by the whole network.
    fn base(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Table of one site.
    fn table(&self, site: &Site, name: &str) -> String {
        if site.id.is_main() {
            self.base(name)
        } else {
            format!("{}{}_{name}", self.prefix, site.id)
        }
    }

    fn require(&self, table: &str) -> Result<(), StoreError> {
        if table_exists(&self.conn, table).map_err(db("checking schema"))? {
            Ok(())
        } else {
            Err(StoreError::MissingTable(table.to_string()))
        }
    }

    fn capabilities_key(&self, site: &Site) -> String {
        self.table(site, "capabilities")
    }

    fn single_site(&self) -> Result<Site, StoreError> {
        let options = self.base("options");
        let url: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT option_value FROM {options} WHERE option_name = 'siteurl'"),
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(db("reading siteurl"))?;

        let (domain, path) = url.as_deref().map_or(("localhost", "/"), split_url);
        Ok(Site {
            id: SiteId::MAIN,
            domain: domain.to_string(),
            path: path.to_string(),
        })
    }

    fn blog(&self, id: SiteId) -> Result<Site, StoreError> {
        let blogs = self.base("blogs");
        self.conn
            .query_row(
                &format!("SELECT blog_id, domain, path FROM {blogs} WHERE blog_id = ?1"),
                params![id.0],
                site_from_row,
            )
            .optional()
            .map_err(db("reading site"))?
            .ok_or(StoreError::UnknownSite(id.0))
    }
}

impl Platform for WpStore {
    fn is_multisite(&self) -> Result<bool, StoreError> {
        Ok(self.multisite)
    }

    fn current_site(&self) -> Result<Site, StoreError> {
        if self.multisite {
            self.blog(self.current)
        } else {
            self.single_site()
        }
    }

    fn sites(&self, limit: usize) -> Result<Vec<Site>, StoreError> {
        if !self.multisite {
            return Ok(vec![self.single_site()?]);
        }

        let blogs = self.base("blogs");
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT blog_id, domain, path FROM {blogs} ORDER BY blog_id LIMIT ?1"
            ))
            .map_err(db("listing sites"))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sites = stmt
            .query_map(params![limit], site_from_row)
            .map_err(db("listing sites"))?;
        sites
            .collect::<Result<Vec<_>, _>>()
            .map_err(db("listing sites"))
    }

    fn users(&self, site: &Site) -> Result<Vec<User>, StoreError> {
        let users = self.base("users");
        let usermeta = self.base("usermeta");
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT u.ID, u.user_login, m.meta_value
                 FROM {users} u
                 JOIN {usermeta} m ON m.user_id = u.ID AND m.meta_key = ?1
                 ORDER BY u.user_login"
            ))
            .map_err(db("listing users"))?;

        let rows = stmt
            .query_map(params![self.capabilities_key(site)], |row| {
                let id: i64 = row.get(0)?;
                let login: String = row.get(1)?;
                let caps: Option<String> = row.get(2)?;
                Ok((id, login, caps.unwrap_or_default()))
            })
            .map_err(db("listing users"))?;

        let mut out = Vec::new();
        for row in rows {
            let (id, login, caps) = row.map_err(db("listing users"))?;
            out.push(User {
                id: UserId(id as u64),
                login,
                roles: php::true_keys(&caps).map(Role::new).collect(),
            });
        }
        Ok(out)
    }

    fn delete_user(
        &mut self,
        site: &Site,
        user: UserId,
        reassign: UserId,
    ) -> Result<bool, StoreError> {
        let posts = self.table(site, "posts");
        let links = self.table(site, "links");
        let users = self.base("users");
        let usermeta = self.base("usermeta");
        let caps_key = self.capabilities_key(site);
        let level_key = self.table(site, "user_level");
        let has_links = table_exists(&self.conn, &links).map_err(db("checking schema"))?;
        let multisite = self.multisite;

        let tx = self.conn.transaction().map_err(db("deleting user"))?;

        tx.execute(
            &format!("UPDATE {posts} SET post_author = ?1 WHERE post_author = ?2"),
            params![reassign.0, user.0],
        )
        .map_err(db("reassigning posts"))?;
        if has_links {
            tx.execute(
                &format!("UPDATE {links} SET link_owner = ?1 WHERE link_owner = ?2"),
                params![reassign.0, user.0],
            )
            .map_err(db("reassigning links"))?;
        }

        let removed = if multisite {
            // Membership only; the account itself goes in the network step.
            tx.execute(
                &format!("DELETE FROM {usermeta} WHERE user_id = ?1 AND meta_key IN (?2, ?3)"),
                params![user.0, caps_key, level_key],
            )
            .map_err(db("removing site membership"))?
                > 0
        } else {
            tx.execute(
                &format!("DELETE FROM {usermeta} WHERE user_id = ?1"),
                params![user.0],
            )
            .map_err(db("deleting user meta"))?;
            tx.execute(&format!("DELETE FROM {users} WHERE ID = ?1"), params![user.0])
                .map_err(db("deleting user"))?
                > 0
        };

        tx.commit().map_err(db("deleting user"))?;
        Ok(removed)
    }

    fn purge(&mut self, site: &Site, target: Purge) -> Result<u64, StoreError> {
        let (table, sql) = match target {
            Purge::CommentMeta => {
                let t = self.table(site, "commentmeta");
                (t.clone(), format!("DELETE FROM {t}"))
            }
            Purge::Comments => {
                let t = self.table(site, "comments");
                (t.clone(), format!("DELETE FROM {t}"))
            }
            Purge::OrderItemMeta => {
                let t = self.table(site, "woocommerce_order_itemmeta");
                (t.clone(), format!("DELETE FROM {t}"))
            }
            Purge::OrderItems => {
                let t = self.table(site, "woocommerce_order_items");
                (t.clone(), format!("DELETE FROM {t}"))
            }
            Purge::OrderPostMeta => {
                let t = self.table(site, "postmeta");
                let posts = self.table(site, "posts");
                let sql = format!(
                    "DELETE FROM {t} WHERE post_id IN \
                     (SELECT ID FROM {posts} WHERE post_type = '{ORDER_POST_TYPE}')"
                );
                (t, sql)
            }
            Purge::OrderPosts => {
                let t = self.table(site, "posts");
                let sql = format!("DELETE FROM {t} WHERE post_type = '{ORDER_POST_TYPE}'");
                (t, sql)
            }
        };

        self.require(&table)?;
        let rows = self.conn.execute(&sql, []).map_err(db("purging"))?;
        Ok(rows as u64)
    }

    fn is_plugin_active(&self, site: &Site, plugin: Plugin) -> Result<bool, StoreError> {
        let options = self.table(site, "options");
        self.require(&options)?;

        let active: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT option_value FROM {options} WHERE option_name = 'active_plugins'"),
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(db("reading active plugins"))?;
        if active.is_some_and(|v| php::contains_string(&v, plugin.slug())) {
            return Ok(true);
        }

        if !self.multisite {
            return Ok(false);
        }
        let sitemeta = self.base("sitemeta");
        if !table_exists(&self.conn, &sitemeta).map_err(db("checking schema"))? {
            return Ok(false);
        }
        let network: Option<String> = self
            .conn
            .query_row(
                &format!(
                    "SELECT meta_value FROM {sitemeta} WHERE meta_key = 'active_sitewide_plugins'"
                ),
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(db("reading network plugins"))?;
        Ok(network.is_some_and(|v| php::contains_string(&v, plugin.slug())))
    }

    fn forms(&self, site: &Site, listing: FormListing) -> Result<Vec<FormId>, StoreError> {
        let forms = self.table(site, "gf_form");
        self.require(&forms)?;

        let trashed = matches!(listing, FormListing::Trashed);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id FROM {forms} WHERE is_trash = ?1 ORDER BY id"))
            .map_err(db("listing forms"))?;
        let ids = stmt
            .query_map(params![trashed], |row| row.get::<_, i64>(0))
            .map_err(db("listing forms"))?;
        ids.map(|id| id.map(|id| FormId(id as u64)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(db("listing forms"))
    }

    fn delete_form_entries(&mut self, site: &Site, form: FormId) -> Result<u64, StoreError> {
        let entry = self.table(site, "gf_entry");
        let meta = self.table(site, "gf_entry_meta");
        let notes = self.table(site, "gf_entry_notes");
        self.require(&entry)?;
        let has_meta = table_exists(&self.conn, &meta).map_err(db("checking schema"))?;
        let has_notes = table_exists(&self.conn, &notes).map_err(db("checking schema"))?;

        let tx = self.conn.transaction().map_err(db("deleting entries"))?;
        if has_meta {
            tx.execute(
                &format!("DELETE FROM {meta} WHERE form_id = ?1"),
                params![form.0],
            )
            .map_err(db("deleting entry meta"))?;
        }
        if has_notes {
            tx.execute(
                &format!(
                    "DELETE FROM {notes} WHERE entry_id IN (SELECT id FROM {entry} WHERE form_id = ?1)"
                ),
                params![form.0],
            )
            .map_err(db("deleting entry notes"))?;
        }
        let entries = tx
            .execute(
                &format!("DELETE FROM {entry} WHERE form_id = ?1"),
                params![form.0],
            )
            .map_err(db("deleting entries"))?;
        tx.commit().map_err(db("deleting entries"))?;

        Ok(entries as u64)
    }

    fn network_users(&self, site: &Site) -> Result<Vec<User>, StoreError> {
        debug!(site = %site.id, "listing network users");
        let users = self.base("users");
        let usermeta = self.base("usermeta");

        let mut accounts: BTreeMap<i64, (String, BTreeSet<Role>)> = BTreeMap::new();
        {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT ID, user_login FROM {users} ORDER BY ID"))
                .map_err(db("listing network users"))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
                .map_err(db("listing network users"))?;
            for row in rows {
                let (id, login) = row.map_err(db("listing network users"))?;
                accounts.insert(id, (login, BTreeSet::new()));
            }
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT user_id, meta_key, meta_value FROM {usermeta} \
                 WHERE meta_key LIKE '%capabilities'"
            ))
            .map_err(db("reading capabilities"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(db("reading capabilities"))?;
        for row in rows {
            let (id, key, value) = row.map_err(db("reading capabilities"))?;
            if !self.is_capabilities_key(&key) {
                continue;
            }
            if let Some((_, roles)) = accounts.get_mut(&id) {
                roles.extend(php::true_keys(value.as_deref().unwrap_or_default()).map(Role::new));
            }
        }

        Ok(accounts
            .into_iter()
            .map(|(id, (login, roles))| User {
                id: UserId(id as u64),
                login,
                roles,
            })
            .collect())
    }

    fn delete_network_user(&mut self, site: &Site, user: UserId) -> Result<bool, StoreError> {
        debug!(site = %site.id, user = %user, "deleting network user");
        let users = self.base("users");
        let usermeta = self.base("usermeta");

        let tx = self.conn.transaction().map_err(db("deleting network user"))?;
        tx.execute(
            &format!("DELETE FROM {usermeta} WHERE user_id = ?1"),
            params![user.0],
        )
        .map_err(db("deleting user meta"))?;
        let removed = tx
            .execute(&format!("DELETE FROM {users} WHERE ID = ?1"), params![user.0])
            .map_err(db("deleting network user"))?;
        tx.commit().map_err(db("deleting network user"))?;

        Ok(removed > 0)
    }

    /// The chain is kept for any mail the platform sends; row deletions in
    /// this store send none, so the filters are held rather than run here.
    fn mail_hooks(&mut self) -> &mut MailHooks {
        &mut self.hooks
    }
}

impl WpStore {
    /// `wp_capabilities` or `wp_<n>_capabilities` for this install's prefix.
    fn is_capabilities_key(&self, key: &str) -> bool {
        let Some(rest) = key.strip_prefix(&self.prefix) else {
            return false;
        };
        if rest == "capabilities" {
            return true;
        }
        rest.strip_suffix("_capabilities")
            .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    }
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )
}

fn site_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        id: SiteId(row.get::<_, i64>(0)? as u64),
        domain: row.get(1)?,
        path: row.get(2)?,
    })
}

/// `https://example.com/blog` -> (`example.com`, `/blog`)
fn split_url(url: &str) -> (&str, &str) {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    }
}
