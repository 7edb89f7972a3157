//! Outbound notification filters
//!
//! Mirrors the host's mail filter chain: every notification passes through
//! the registered filters in ascending priority before delivery.

use std::fmt;

/// Recipient every notification is rewritten to while a purge runs.
pub const BLACKHOLE: &str = ":blackhole:";

/// Priority of the redaction filter; late enough to override other filters.
pub const REDACT_PRIORITY: i32 = 99_999;

/// An outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    /// Recipient address(es) as the host formats them.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl Mail {
    /// Create a notification.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// A single mail filter.
pub type MailFilter = Box<dyn Fn(Mail) -> Mail + Send + Sync>;

/// Ordered mail filter chain. Filters live as long as the chain does.
#[derive(Default)]
pub struct MailHooks {
    filters: Vec<(i32, MailFilter)>,
}

impl fmt::Debug for MailHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailHooks")
            .field(
                "priorities",
                &self.filters.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl MailHooks {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter. Equal priorities run in registration order.
    pub fn add_filter(
        &mut self,
        priority: i32,
        filter: impl Fn(Mail) -> Mail + Send + Sync + 'static,
    ) {
        let idx = self.filters.partition_point(|(p, _)| *p <= priority);
        self.filters.insert(idx, (priority, Box::new(filter)));
    }

    /// Run `mail` through every filter.
    pub fn apply(&self, mail: Mail) -> Mail {
        self.filters.iter().fold(mail, |mail, (_, filter)| filter(mail))
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Filter that sends a notification nowhere.
pub fn redact_recipient(mut mail: Mail) -> Mail {
    BLACKHOLE.clone_into(&mut mail.to);
    mail
}
