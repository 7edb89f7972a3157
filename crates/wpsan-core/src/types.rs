//! Identifiers and records shared between the sanitizer and its platforms.

use std::collections::BTreeSet;
use std::fmt;

/// Numeric WordPress user id (`users.ID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Multisite blog id (`blogs.blog_id`). Single-site installs only have the main site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteId(pub u64);

impl SiteId {
    /// The main site of every install.
    pub const MAIN: Self = Self(1);

    /// Whether this is the main site, whose tables carry the bare base prefix.
    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gravity Forms form id (`gf_form.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormId(pub u64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role slug such as `administrator` or `subscriber`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(String);

impl Role {
    /// Slug of the role whose holders always survive the purge.
    pub const ADMINISTRATOR: &'static str = "administrator";

    /// Create a role from its slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The administrator role.
    pub fn administrator() -> Self {
        Self::new(Self::ADMINISTRATOR)
    }

    /// The role slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the administrator role.
    pub fn is_administrator(&self) -> bool {
        self.0 == Self::ADMINISTRATOR
    }
}

impl From<&str> for Role {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user account together with the roles it holds.
///
/// For per-site listings `roles` are the roles on that site; for network
/// listings they are the union over every site of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account id.
    pub id: UserId,
    /// Login name (`users.user_login`).
    pub login: String,
    /// Roles held by the account.
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Create a user holding no roles.
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            login: login.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Builder-style role grant.
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Whether the user holds the role with the given slug.
    pub fn has_role(&self, slug: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == slug)
    }

    /// Whether the user holds the administrator role.
    pub fn is_administrator(&self) -> bool {
        self.roles.iter().any(Role::is_administrator)
    }
}

/// Explicit handle to one tenant of an install.
///
/// Every per-site platform call receives the handle of the site it acts
/// on; there is no ambient "current blog".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Blog id.
    pub id: SiteId,
    /// Domain name, e.g. `shop.example.com`.
    pub domain: String,
    /// Path below the domain, `/` for domain-based installs.
    pub path: String,
}

impl Site {
    /// Create a site handle.
    pub fn new(id: u64, domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: SiteId(id),
            domain: domain.into(),
            path: path.into(),
        }
    }
}

/// Optional plugins whose data gets purged when they are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plugin {
    /// Gravity Forms (form entries).
    GravityForms,
    /// WooCommerce (orders).
    WooCommerce,
}

impl Plugin {
    /// Plugin basename as stored in `active_plugins`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::GravityForms => "gravityforms/gravityforms.php",
            Self::WooCommerce => "woocommerce/woocommerce.php",
        }
    }

    /// Human-readable plugin name.
    pub fn label(self) -> &'static str {
        match self {
            Self::GravityForms => "Gravity Forms",
            Self::WooCommerce => "WooCommerce",
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two form listings whose union covers every form of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormListing {
    /// Forms in the trash, active or not.
    Trashed,
    /// Forms outside the trash, active or not.
    Visible,
}

impl FormListing {
    /// Listings in the order they are requested.
    pub const ALL: [Self; 2] = [Self::Trashed, Self::Visible];
}

/// Bulk purge targets. Each one is an unconditional, uncounted delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Purge {
    /// Every `commentmeta` row.
    CommentMeta,
    /// Every `comments` row, order notes included.
    Comments,
    /// Every `woocommerce_order_itemmeta` row.
    OrderItemMeta,
    /// Every `woocommerce_order_items` row.
    OrderItems,
    /// `postmeta` rows belonging to `shop_order` posts.
    OrderPostMeta,
    /// `posts` rows of type `shop_order`.
    OrderPosts,
}

impl Purge {
    /// Comment purge, metadata first.
    pub const COMMENTS: [Self; 2] = [Self::CommentMeta, Self::Comments];

    /// Order purge in dependency order: dependents before the order posts.
    pub const ORDERS: [Self; 4] = [
        Self::OrderItemMeta,
        Self::OrderItems,
        Self::OrderPostMeta,
        Self::OrderPosts,
    ];
}
