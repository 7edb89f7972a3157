//! Which accounts survive the purge.

use std::fmt;

use crate::types::{Role, User};

type Predicate = Box<dyn Fn(&User) -> bool + Send + Sync>;

/// Predicates combined by logical OR: a user matching any of them is exempt.
///
/// Administrators are always exempt; registered predicates can only widen
/// the exempt set.
pub struct ExemptionPolicy {
    predicates: Vec<Predicate>,
}

impl fmt::Debug for ExemptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExemptionPolicy")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl Default for ExemptionPolicy {
    fn default() -> Self {
        Self {
            predicates: vec![Box::new(User::is_administrator) as Predicate],
        }
    }
}

impl ExemptionPolicy {
    /// Exempt administrators only.
    pub fn administrators_only() -> Self {
        Self::default()
    }

    /// Register an additional exemption predicate.
    pub fn register(
        &mut self,
        predicate: impl Fn(&User) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Exempt every holder of any of `roles`.
    pub fn exempt_roles(&mut self, roles: impl IntoIterator<Item = Role>) -> &mut Self {
        let roles: Vec<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return self;
        }
        self.register(move |user| roles.iter().any(|role| user.roles.contains(role)))
    }

    /// Whether anything beyond the administrator default was registered.
    pub fn is_widened(&self) -> bool {
        self.predicates.len() > 1
    }

    /// Whether `user` must not be deleted.
    pub fn is_exempt(&self, user: &User) -> bool {
        self.predicates.iter().any(|p| p(user))
    }
}
