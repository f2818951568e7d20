use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{coordinator, CoordinatorConfig};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "qrgen.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub reveal_delay_ms: u64,
    pub success_alert_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5002".into(),
            reveal_delay_ms: coordinator::DEFAULT_REVEAL_DELAY.as_millis() as u64,
            success_alert_ms: coordinator::DEFAULT_SUCCESS_ALERT_DURATION.as_millis() as u64,
            request_timeout_secs: client_core::transport::DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            success_alert_duration: Duration::from_millis(self.success_alert_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    reveal_delay_ms: Option<u64>,
    success_alert_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let path = Path::new(SETTINGS_FILE);
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.reveal_delay_ms {
        settings.reveal_delay_ms = v;
    }
    if let Some(v) = file_cfg.success_alert_ms {
        settings.success_alert_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

/// Environment overrides; the `APP__` form wins over the plain one.
fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["QRGEN_SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = lookup(key) {
            settings.server_url = v;
        }
    }
    for key in ["QRGEN_REVEAL_DELAY_MS", "APP__REVEAL_DELAY_MS"] {
        if let Some(v) = lookup(key).and_then(|v| v.parse().ok()) {
            settings.reveal_delay_ms = v;
        }
    }
    for key in ["QRGEN_SUCCESS_ALERT_MS", "APP__SUCCESS_ALERT_MS"] {
        if let Some(v) = lookup(key).and_then(|v| v.parse().ok()) {
            settings.success_alert_ms = v;
        }
    }
    for key in ["QRGEN_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
        if let Some(v) = lookup(key).and_then(|v| v.parse().ok()) {
            settings.request_timeout_secs = v;
        }
    }
}
