//! Throwaway WordPress databases for store tests.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tempfile::TempDir;

use super::WpStore;

const PREFIX: &str = "wp_";

/// A SQLite file with the core, WooCommerce and Gravity Forms tables.
pub(crate) struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

fn site_prefix(site: u64) -> String {
    if site == 1 {
        PREFIX.to_string()
    } else {
        format!("{PREFIX}{site}_")
    }
}

fn site_tables(p: &str) -> String {
    format!(
        "CREATE TABLE {p}options (option_id INTEGER PRIMARY KEY, option_name TEXT UNIQUE, option_value TEXT);
         CREATE TABLE {p}posts (ID INTEGER PRIMARY KEY, post_author INTEGER, post_type TEXT);
         CREATE TABLE {p}postmeta (meta_id INTEGER PRIMARY KEY, post_id INTEGER, meta_key TEXT, meta_value TEXT);
         CREATE TABLE {p}comments (comment_ID INTEGER PRIMARY KEY, comment_type TEXT);
         CREATE TABLE {p}commentmeta (meta_id INTEGER PRIMARY KEY, comment_id INTEGER, meta_key TEXT);
         CREATE TABLE {p}links (link_id INTEGER PRIMARY KEY, link_owner INTEGER);
         CREATE TABLE {p}woocommerce_order_items (order_item_id INTEGER PRIMARY KEY, order_id INTEGER);
         CREATE TABLE {p}woocommerce_order_itemmeta (meta_id INTEGER PRIMARY KEY, order_item_id INTEGER, meta_key TEXT);
         CREATE TABLE {p}gf_form (id INTEGER PRIMARY KEY, is_active INTEGER, is_trash INTEGER);
         CREATE TABLE {p}gf_entry (id INTEGER PRIMARY KEY, form_id INTEGER);
         CREATE TABLE {p}gf_entry_meta (id INTEGER PRIMARY KEY, form_id INTEGER, entry_id INTEGER, meta_key TEXT);
         CREATE TABLE {p}gf_entry_notes (id INTEGER PRIMARY KEY, entry_id INTEGER, value TEXT);"
    )
}

/// PHP-serialized capabilities array, as WordPress stores it.
pub(crate) fn serialized_caps(roles: &[&str]) -> String {
    let mut out = format!("a:{}:{{", roles.len());
    for role in roles {
        let _ = write!(out, "s:{}:\"{role}\";b:1;", role.len());
    }
    out.push('}');
    out
}

/// PHP-serialized list of plugin files.
fn serialized_list(items: &[&str]) -> String {
    let mut out = format!("a:{}:{{", items.len());
    for (i, item) in items.iter().enumerate() {
        let _ = write!(out, "i:{i};s:{}:\"{item}\";", item.len());
    }
    out.push('}');
    out
}

impl Fixture {
    fn create(sql: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ht.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!(
            "CREATE TABLE {PREFIX}users (ID INTEGER PRIMARY KEY, user_login TEXT, user_email TEXT);
             CREATE TABLE {PREFIX}usermeta (umeta_id INTEGER PRIMARY KEY, user_id INTEGER, meta_key TEXT, meta_value TEXT);"
        ))
        .unwrap();
        conn.execute_batch(sql).unwrap();
        Self {
            _dir: dir,
            path,
            conn,
        }
    }

    /// Single-site install at `https://example.test`.
    pub(crate) fn single() -> Self {
        let fixture = Self::create(&site_tables(PREFIX));
        fixture
            .conn
            .execute(
                &format!("INSERT INTO {PREFIX}options (option_name, option_value) VALUES ('siteurl', 'https://example.test')"),
                [],
            )
            .unwrap();
        fixture
    }

    /// Network with the given `(blog_id, domain)` sites.
    pub(crate) fn multisite(sites: &[(u64, &str)]) -> Self {
        let mut sql = format!(
            "CREATE TABLE {PREFIX}blogs (blog_id INTEGER PRIMARY KEY, site_id INTEGER, domain TEXT, path TEXT);
             CREATE TABLE {PREFIX}sitemeta (meta_id INTEGER PRIMARY KEY, site_id INTEGER, meta_key TEXT, meta_value TEXT);"
        );
        for (id, _) in sites {
            sql.push_str(&site_tables(&site_prefix(*id)));
        }
        let fixture = Self::create(&sql);
        for (id, domain) in sites {
            fixture
                .conn
                .execute(
                    &format!("INSERT INTO {PREFIX}blogs (blog_id, site_id, domain, path) VALUES (?1, 1, ?2, '/')"),
                    params![id, domain],
                )
                .unwrap();
        }
        fixture
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn store(&self) -> WpStore {
        WpStore::open_at(&self.path, PREFIX, None).unwrap()
    }

    pub(crate) fn exec(&self, sql: &str) {
        self.conn.execute_batch(sql).unwrap();
    }

    pub(crate) fn count(&self, sql: &str) -> i64 {
        self.conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    /// Account row without any site membership.
    pub(crate) fn account(&self, id: u64, login: &str) {
        self.conn
            .execute(
                &format!("INSERT OR IGNORE INTO {PREFIX}users (ID, user_login, user_email) VALUES (?1, ?2, ?3)"),
                params![id, login, format!("{login}@example.test")],
            )
            .unwrap();
    }

    pub(crate) fn usermeta(&self, user: u64, key: &str, value: &str) {
        self.conn
            .execute(
                &format!("INSERT INTO {PREFIX}usermeta (user_id, meta_key, meta_value) VALUES (?1, ?2, ?3)"),
                params![user, key, value],
            )
            .unwrap();
    }

    /// Account plus membership of `site` with `roles`.
    pub(crate) fn user(&self, id: u64, login: &str, site: u64, roles: &[&str]) {
        self.account(id, login);
        let p = site_prefix(site);
        self.usermeta(id, &format!("{p}capabilities"), &serialized_caps(roles));
        self.usermeta(id, &format!("{p}user_level"), "0");
    }

    pub(crate) fn post(&self, id: u64, author: u64, post_type: &str) {
        self.post_on(1, id, author, post_type);
    }

    pub(crate) fn post_on(&self, site: u64, id: u64, author: u64, post_type: &str) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}posts (ID, post_author, post_type) VALUES (?1, ?2, ?3)"),
                params![id, author, post_type],
            )
            .unwrap();
        self.conn
            .execute(
                &format!("INSERT INTO {p}postmeta (post_id, meta_key, meta_value) VALUES (?1, '_edit_lock', '1')"),
                params![id],
            )
            .unwrap();
    }

    pub(crate) fn link(&self, id: u64, owner: u64) {
        self.conn
            .execute(
                &format!("INSERT INTO {PREFIX}links (link_id, link_owner) VALUES (?1, ?2)"),
                params![id, owner],
            )
            .unwrap();
    }

    pub(crate) fn comment(&self, id: u64, comment_type: &str) {
        self.comment_on(1, id, comment_type);
    }

    pub(crate) fn comment_on(&self, site: u64, id: u64, comment_type: &str) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}comments (comment_ID, comment_type) VALUES (?1, ?2)"),
                params![id, comment_type],
            )
            .unwrap();
        self.conn
            .execute(
                &format!("INSERT INTO {p}commentmeta (comment_id, meta_key) VALUES (?1, 'rating')"),
                params![id],
            )
            .unwrap();
    }

    pub(crate) fn order_item(&self, item: u64, order: u64) {
        self.order_item_on(1, item, order);
    }

    pub(crate) fn order_item_on(&self, site: u64, item: u64, order: u64) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}woocommerce_order_items (order_item_id, order_id) VALUES (?1, ?2)"),
                params![item, order],
            )
            .unwrap();
        self.conn
            .execute(
                &format!("INSERT INTO {p}woocommerce_order_itemmeta (order_item_id, meta_key) VALUES (?1, '_qty')"),
                params![item],
            )
            .unwrap();
    }

    pub(crate) fn form(&self, id: u64, active: bool, trashed: bool) {
        self.form_on(1, id, active, trashed);
    }

    pub(crate) fn form_on(&self, site: u64, id: u64, active: bool, trashed: bool) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}gf_form (id, is_active, is_trash) VALUES (?1, ?2, ?3)"),
                params![id, active, trashed],
            )
            .unwrap();
    }

    /// Entry with one meta row and one note.
    pub(crate) fn entry(&self, id: u64, form: u64) {
        self.entry_on(1, id, form);
    }

    pub(crate) fn entry_on(&self, site: u64, id: u64, form: u64) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}gf_entry (id, form_id) VALUES (?1, ?2)"),
                params![id, form],
            )
            .unwrap();
        self.conn
            .execute(
                &format!("INSERT INTO {p}gf_entry_meta (form_id, entry_id, meta_key) VALUES (?1, ?2, '1')"),
                params![form, id],
            )
            .unwrap();
        self.conn
            .execute(
                &format!("INSERT INTO {p}gf_entry_notes (entry_id, value) VALUES (?1, 'note')"),
                params![id],
            )
            .unwrap();
    }

    pub(crate) fn activate_plugin(&self, site: u64, slug: &str) {
        let p = site_prefix(site);
        self.conn
            .execute(
                &format!("INSERT INTO {p}options (option_name, option_value) VALUES ('active_plugins', ?1)"),
                params![serialized_list(&[slug])],
            )
            .unwrap();
    }

    pub(crate) fn activate_network_plugin(&self, slug: &str) {
        let value = format!("a:1:{{s:{}:\"{slug}\";i:1700000000;}}", slug.len());
        self.conn
            .execute(
                &format!("INSERT INTO {PREFIX}sitemeta (site_id, meta_key, meta_value) VALUES (1, 'active_sitewide_plugins', ?1)"),
                params![value],
            )
            .unwrap();
    }
}

#[test]
fn test_serialized_caps_shape() {
    assert_eq!(
        serialized_caps(&["administrator"]),
        r#"a:1:{s:13:"administrator";b:1;}"#
    );
}
