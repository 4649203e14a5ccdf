//! Configuration loading and persistence.
//!
//! Reads `config.json` from the config directory, then applies
//! `PUSHBELL_*` environment overrides. Missing or unreadable files fall back
//! to defaults built from [`crate::constants`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::{fs, path::PathBuf, time::Duration};

use crate::constants;
use crate::notifications::Platform;

/// Configuration for the pushbell CLI.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Push-relay endpoint receiving remote message envelopes.
    pub relay_url: String,
    /// Project identifier used to scope the push token.
    pub project_id: String,
    /// Delay before a local notification is delivered, in milliseconds.
    pub local_delay_ms: u64,
    /// Delay before the remote push request is sent, in milliseconds.
    pub remote_delay_ms: u64,
    /// Platform variant to behave as (controls channel setup).
    pub platform: Platform,
    /// Whether the host counts as a physical device.
    pub physical_device: bool,
    /// Answer given to the permission prompt in headless mode.
    pub auto_grant: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_url: constants::PUSH_SEND_URL.to_string(),
            project_id: constants::PROJECT_ID.to_string(),
            local_delay_ms: duration_ms(constants::LOCAL_NOTIFICATION_DELAY),
            remote_delay_ms: duration_ms(constants::REMOTE_SEND_DELAY),
            platform: Platform::current(),
            physical_device: true,
            auto_grant: true,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Parses a boolean-ish environment value (`1/true/yes/on`, `0/false/no/off`).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `#[cfg(test)]` (unit tests): `tmp/pushbell-test`
    /// 2. `PUSHBELL_CONFIG_DIR` env var: explicit override
    /// 3. `PUSHBELL_ENV=test`: `tmp/pushbell-test`
    /// 4. Default: platform config dir (e.g. `~/.config/pushbell`)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = {
            #[cfg(test)]
            {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/pushbell-test")
            }

            #[cfg(not(test))]
            {
                if let Ok(custom_dir) = std::env::var("PUSHBELL_CONFIG_DIR") {
                    PathBuf::from(custom_dir)
                } else if crate::env::is_test_mode() {
                    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/pushbell-test")
                } else {
                    dirs::config_dir()
                        .context("Could not determine config directory")?
                        .join("pushbell")
                }
            }
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::load_from_file() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("[Config] Ignoring unreadable config file: {e:#}");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Option<Self>> {
        let config_path = Self::config_dir()?.join("config.json");
        if !config_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = serde_json::from_str(&content).context("Failed to parse config.json")?;
        Ok(Some(config))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(relay_url) = std::env::var("PUSHBELL_RELAY_URL") {
            self.relay_url = relay_url;
        }

        if let Ok(project_id) = std::env::var("PUSHBELL_PROJECT_ID") {
            self.project_id = project_id;
        }

        if let Ok(delay) = std::env::var("PUSHBELL_LOCAL_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                self.local_delay_ms = ms;
            }
        }

        if let Ok(delay) = std::env::var("PUSHBELL_REMOTE_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                self.remote_delay_ms = ms;
            }
        }

        if let Ok(platform) = std::env::var("PUSHBELL_PLATFORM") {
            match platform.parse::<Platform>() {
                Ok(platform) => self.platform = platform,
                Err(e) => log::warn!("[Config] {e}"),
            }
        }

        if let Some(physical) = std::env::var("PUSHBELL_PHYSICAL_DEVICE")
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            self.physical_device = physical;
        }

        if let Some(grant) = std::env::var("PUSHBELL_AUTO_GRANT")
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            self.auto_grant = grant;
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        #[cfg(unix)]
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Delay before a local notification is delivered.
    pub fn local_delay(&self) -> Duration {
        Duration::from_millis(self.local_delay_ms)
    }

    /// Delay before the remote push request is sent.
    pub fn remote_delay(&self) -> Duration {
        Duration::from_millis(self.remote_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.relay_url, "https://exp.host/--/api/v2/push/send");
        assert_eq!(config.project_id, "f76084b6-e5c2-4f66-bac8-b0cc25c18c42");
        assert_eq!(config.local_delay(), Duration::from_secs(2));
        assert_eq!(config.remote_delay(), Duration::from_secs(3));
        assert!(config.physical_device);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"platform": "android", "remote_delay_ms": 10}"#)
                .expect("parse");
        assert_eq!(config.platform, Platform::Android);
        assert_eq!(config.remote_delay_ms, 10);
        assert_eq!(config.local_delay_ms, 2000);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_config_dir_is_repo_local_in_unit_tests() {
        let dir = Config::config_dir().expect("config dir");
        assert!(dir.ends_with("tmp/pushbell-test"));
    }
}
