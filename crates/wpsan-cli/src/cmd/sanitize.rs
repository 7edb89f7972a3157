//! gdpr-sanitize command
use anyhow::{Context, Result};
use wpsan_core::{ExemptionPolicy, Reporter, Sanitizer};

use crate::InstallArgs;
use crate::config::Settings;
use crate::env::DotEnv;
use crate::store::WpStore;
use crate::ui::{LinePrompt, Output};

/// Delete non-admin users, comments, form entries and orders from the install
pub fn gdpr_sanitize(args: &InstallArgs) -> Result<()> {
    let settings = Settings::resolve(args).context("Failed to load configuration")?;
    let mut store = WpStore::open(&settings).with_context(|| {
        format!(
            "Failed to open WordPress database {}",
            settings.db_path.display()
        )
    })?;
    let env = DotEnv::discover(&settings.env_file)
        .with_context(|| format!("Failed to read {}", settings.env_file.display()))?;

    let mut policy = ExemptionPolicy::default();
    policy.exempt_roles(settings.exempt_roles.iter().cloned());

    let output = Output::new();
    let prompt = LinePrompt::terminal();
    let mut sanitizer = Sanitizer::new(&output, &prompt).with_policy(policy);
    if let Some(env) = &env {
        sanitizer = sanitizer.with_environment(env);
    }

    match sanitizer.run(&mut store) {
        Ok(summary) => {
            tracing::debug!(
                sites = summary.sites.len(),
                errors = summary.has_errors(),
                "sanitize finished"
            );
            if summary.has_errors() {
                output.info("Finished with errors; re-run to retry the failed steps.");
            }
            Ok(())
        }
        Err(e) if e.is_abort() => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to read the install's sites"),
    }
}
