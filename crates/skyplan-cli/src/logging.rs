// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "SKYPLAN_LOG";

/// Sends log output to `path`; the terminal belongs to the TUI.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [logging].file to a writable path",
                path.display()
            )
        })?;

    let override_filter = std::env::var(LOG_ENV).ok();
    tracing_subscriber::registry()
        .with(env_filter(override_filter.as_deref(), level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn env_filter(override_filter: Option<&str>, level: &str) -> Result<EnvFilter> {
    let directives = override_filter
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(level);
    EnvFilter::try_new(directives).with_context(|| {
        format!("invalid log filter {directives:?}; fix {LOG_ENV} or [logging].level")
    })
}

#[cfg(test)]
mod tests {
    use super::env_filter;
    use anyhow::Result;

    #[test]
    fn configured_level_applies_without_override() -> Result<()> {
        let filter = env_filter(None, "warn")?;
        assert_eq!(filter.to_string(), "warn");
        Ok(())
    }

    #[test]
    fn env_override_wins_over_configured_level() -> Result<()> {
        let filter = env_filter(Some("skyplan_data=debug"), "info")?;
        assert_eq!(filter.to_string(), "skyplan_data=debug");
        Ok(())
    }

    #[test]
    fn blank_override_is_ignored() -> Result<()> {
        let filter = env_filter(Some("   "), "error")?;
        assert_eq!(filter.to_string(), "error");
        Ok(())
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let error = env_filter(Some("skyplan=loud"), "info").expect_err("bad level should fail");
        assert!(error.to_string().contains("SKYPLAN_LOG"));
    }
}
