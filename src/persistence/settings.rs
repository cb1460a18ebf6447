use super::files::atomic_write;
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment override for the display endpoint
pub const DISPLAY_URL_ENV: &str = "MINDFUL_DISPLAY_URL";

const DEFAULT_TICK_SECONDS: u64 = 1;
const DEFAULT_EXTENSION_MINUTES: i64 = 15;
const MAX_EXTENSION_MINUTES: i64 = 24 * 60;
const DEFAULT_DURATION_SECS: i64 = 60;
const DEFAULT_DISPLAY_TIMEOUT_MS: u64 = 2000;

/// Deployment settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Clock period; also the reminder firing window
    pub tick_seconds: u64,
    /// Time granted by the overdue prompt
    pub extension_minutes: i64,
    /// Offsets (seconds before end) offered in the edit form
    pub reminder_offsets: Vec<i64>,
    /// Offsets preselected for a new task
    pub default_reminders: Vec<i64>,
    /// Duration prefilled for a new task
    pub default_duration_secs: i64,
    pub display_endpoint: Option<String>,
    pub display_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_seconds: DEFAULT_TICK_SECONDS,
            extension_minutes: DEFAULT_EXTENSION_MINUTES,
            reminder_offsets: vec![30, 60, 120, 300, 600, 900, 1800],
            default_reminders: Vec::new(),
            default_duration_secs: DEFAULT_DURATION_SECS,
            display_endpoint: None,
            display_timeout_ms: DEFAULT_DISPLAY_TIMEOUT_MS,
        }
    }
}

impl Settings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_seconds)
    }

    pub fn extension_secs(&self) -> i64 {
        self.extension_minutes.saturating_mul(60)
    }

    pub fn display_timeout(&self) -> Duration {
        Duration::from_millis(self.display_timeout_ms)
    }

    /// Replace values the engine cannot work with by their defaults
    fn normalized(mut self) -> Self {
        if self.tick_seconds == 0 {
            warn!("tick_seconds must be positive, using {}", DEFAULT_TICK_SECONDS);
            self.tick_seconds = DEFAULT_TICK_SECONDS;
        }
        if self.extension_minutes <= 0 {
            warn!(
                "extension_minutes must be positive, using {}",
                DEFAULT_EXTENSION_MINUTES
            );
            self.extension_minutes = DEFAULT_EXTENSION_MINUTES;
        } else if self.extension_minutes > MAX_EXTENSION_MINUTES {
            warn!(
                "extension_minutes above {}, capping",
                MAX_EXTENSION_MINUTES
            );
            self.extension_minutes = MAX_EXTENSION_MINUTES;
        }
        if self.default_duration_secs <= 0 {
            self.default_duration_secs = DEFAULT_DURATION_SECS;
        }

        self.reminder_offsets.retain(|offset| *offset > 0);
        self.reminder_offsets.sort_unstable();
        self.reminder_offsets.dedup();
        let offsets = self.reminder_offsets.clone();
        self.default_reminders.retain(|offset| offsets.contains(offset));

        if let Some(endpoint) = &self.display_endpoint {
            if endpoint.trim().is_empty() {
                self.display_endpoint = None;
            }
        }
        self
    }

    /// Apply environment overrides on top of the file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(DISPLAY_URL_ENV) {
            if !url.trim().is_empty() {
                self.display_endpoint = Some(url.trim().to_string());
            }
        }
        self
    }
}

/// Load settings from config.json, defaults when the file is absent
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(settings.normalized())
}

/// Save settings to config.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    atomic_write(path, &json)?;
    Ok(())
}
