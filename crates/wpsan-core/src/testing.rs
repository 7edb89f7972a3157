//! Test doubles: an in-memory platform that records every call, plus
//! scripted operator collaborators.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::guard::{Environment, Prompter};
use crate::mail::MailHooks;
use crate::platform::Platform;
use crate::reporter::Reporter;
use crate::types::{FormId, FormListing, Plugin, Purge, Site, SiteId, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    IsMultisite,
    CurrentSite,
    Sites,
    Users(SiteId),
    DeleteUser(SiteId, UserId, UserId),
    Purge(SiteId, Purge),
    PluginActive(SiteId, Plugin),
    Forms(SiteId, FormListing),
    DeleteFormEntries(SiteId, FormId),
    NetworkUsers(SiteId),
    DeleteNetworkUser(SiteId, UserId),
    InstallMailFilter,
}

impl Call {
    pub(crate) fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::DeleteUser(..)
                | Self::Purge(..)
                | Self::DeleteFormEntries(..)
                | Self::DeleteNetworkUser(..)
        )
    }

    pub(crate) fn is_per_site(&self) -> bool {
        matches!(
            self,
            Self::Users(_)
                | Self::DeleteUser(..)
                | Self::Purge(..)
                | Self::PluginActive(..)
                | Self::Forms(..)
                | Self::DeleteFormEntries(..)
        )
    }
}

pub(crate) struct MockPlatform {
    multisite: bool,
    current: SiteId,
    sites: Vec<Site>,
    users: BTreeMap<SiteId, Vec<User>>,
    network_users: Vec<User>,
    failing_users: BTreeSet<UserId>,
    failing_purges: BTreeSet<Purge>,
    plugins: BTreeSet<(SiteId, Plugin)>,
    forms: BTreeMap<(SiteId, FormListing), Vec<FormId>>,
    hooks: MailHooks,
    calls: RefCell<Vec<Call>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            multisite: false,
            current: SiteId::MAIN,
            sites: Vec::new(),
            users: BTreeMap::new(),
            network_users: Vec::new(),
            failing_users: BTreeSet::new(),
            failing_purges: BTreeSet::new(),
            plugins: BTreeSet::new(),
            forms: BTreeMap::new(),
            hooks: MailHooks::new(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl MockPlatform {
    pub(crate) fn single_site() -> Self {
        Self {
            current: SiteId::MAIN,
            sites: vec![Site::new(1, "example.test", "/")],
            ..Self::default()
        }
    }

    pub(crate) fn multisite(sites: Vec<Site>) -> Self {
        Self {
            multisite: true,
            current: SiteId::MAIN,
            sites,
            ..Self::default()
        }
    }

    pub(crate) fn current(mut self, site: SiteId) -> Self {
        self.current = site;
        self
    }

    pub(crate) fn with_users(mut self, site: SiteId, users: Vec<User>) -> Self {
        self.users.insert(site, users);
        self
    }

    pub(crate) fn with_network_users(mut self, users: Vec<User>) -> Self {
        self.network_users = users;
        self
    }

    pub(crate) fn with_plugin(mut self, site: SiteId, plugin: Plugin) -> Self {
        self.plugins.insert((site, plugin));
        self
    }

    pub(crate) fn with_forms(mut self, site: SiteId, listing: FormListing, ids: &[u64]) -> Self {
        self.forms
            .insert((site, listing), ids.iter().copied().map(FormId).collect());
        self
    }

    pub(crate) fn failing_user(mut self, user: UserId) -> Self {
        self.failing_users.insert(user);
        self
    }

    pub(crate) fn failing_purge(mut self, target: Purge) -> Self {
        self.failing_purges.insert(target);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    /// `(deleted, reassigned_to)` pairs in call order.
    pub(crate) fn user_deletions(&self) -> Vec<(UserId, UserId)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteUser(_, user, heir) => Some((user, heir)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn network_deletions(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteNetworkUser(_, user) => Some(user),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn members(&self, site: SiteId) -> Vec<UserId> {
        self.users
            .get(&site)
            .map(|users| users.iter().map(|u| u.id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn mail_filters(&self) -> &MailHooks {
        &self.hooks
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn boom(context: &'static str) -> StoreError {
        StoreError::backend(context, std::io::Error::other("injected failure"))
    }
}

impl Platform for MockPlatform {
    fn is_multisite(&self) -> Result<bool, StoreError> {
        self.record(Call::IsMultisite);
        Ok(self.multisite)
    }

    fn current_site(&self) -> Result<Site, StoreError> {
        self.record(Call::CurrentSite);
        let id = self.current;
        self.sites
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::UnknownSite(id.0))
    }

    fn sites(&self, limit: usize) -> Result<Vec<Site>, StoreError> {
        self.record(Call::Sites);
        Ok(self.sites.iter().take(limit).cloned().collect())
    }

    fn users(&self, site: &Site) -> Result<Vec<User>, StoreError> {
        self.record(Call::Users(site.id));
        Ok(self.users.get(&site.id).cloned().unwrap_or_default())
    }

    fn delete_user(
        &mut self,
        site: &Site,
        user: UserId,
        reassign: UserId,
    ) -> Result<bool, StoreError> {
        self.record(Call::DeleteUser(site.id, user, reassign));
        if self.failing_users.contains(&user) {
            return Ok(false);
        }
        let members = self.users.entry(site.id).or_default();
        let before = members.len();
        members.retain(|u| u.id != user);
        Ok(members.len() < before)
    }

    fn purge(&mut self, site: &Site, target: Purge) -> Result<u64, StoreError> {
        self.record(Call::Purge(site.id, target));
        if self.failing_purges.contains(&target) {
            return Err(Self::boom("purge"));
        }
        Ok(0)
    }

    fn is_plugin_active(&self, site: &Site, plugin: Plugin) -> Result<bool, StoreError> {
        self.record(Call::PluginActive(site.id, plugin));
        Ok(self.plugins.contains(&(site.id, plugin)))
    }

    fn forms(&self, site: &Site, listing: FormListing) -> Result<Vec<FormId>, StoreError> {
        self.record(Call::Forms(site.id, listing));
        Ok(self.forms.get(&(site.id, listing)).cloned().unwrap_or_default())
    }

    fn delete_form_entries(&mut self, site: &Site, form: FormId) -> Result<u64, StoreError> {
        self.record(Call::DeleteFormEntries(site.id, form));
        Ok(1)
    }

    fn network_users(&self, site: &Site) -> Result<Vec<User>, StoreError> {
        self.record(Call::NetworkUsers(site.id));
        Ok(self.network_users.clone())
    }

    fn delete_network_user(&mut self, site: &Site, user: UserId) -> Result<bool, StoreError> {
        self.record(Call::DeleteNetworkUser(site.id, user));
        if self.failing_users.contains(&user) {
            return Err(Self::boom("delete network user"));
        }
        let before = self.network_users.len();
        self.network_users.retain(|u| u.id != user);
        Ok(self.network_users.len() < before)
    }

    fn mail_hooks(&mut self) -> &mut MailHooks {
        self.record(Call::InstallMailFilter);
        &mut self.hooks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    Log(String),
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    lines: Mutex<Vec<Line>>,
}

impl RecordingReporter {
    pub(crate) fn lines(&self) -> Vec<Line> {
        self.lines.lock().unwrap().clone()
    }

    pub(crate) fn has(&self, line: Line) -> bool {
        self.lines().contains(&line)
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                Line::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, line: Line) {
        self.lines.lock().unwrap().push(line);
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, msg: &str) {
        self.push(Line::Log(msg.to_string()));
    }
    fn success(&self, msg: &str) {
        self.push(Line::Success(msg.to_string()));
    }
    fn warning(&self, msg: &str) {
        self.push(Line::Warning(msg.to_string()));
    }
    fn error(&self, msg: &str) {
        self.push(Line::Error(msg.to_string()));
    }
}

/// Answers prompts from a fixed script; runs out as "no".
pub(crate) struct ScriptedPrompter {
    answers: RefCell<Vec<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        Self {
            answers: RefCell::new(answers),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> std::io::Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop().unwrap_or(false))
    }
}

#[derive(Debug, Default)]
pub(crate) struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub(crate) fn with(key: &str, value: &str) -> Self {
        Self {
            vars: HashMap::from([(key.to_string(), value.to_string())]),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
