//! TOML-based application configuration.
//!
//! Stores the canonical timezone, scheduled-job firing times, channel
//! names and summarizer settings. Stored at `<data_dir>/config.toml`;
//! every field has a serde default so a missing or partial file works.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::week;

/// Wall-clock firing time for a scheduled job, in the local timezone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JobTime {
    pub hour: u32,
    pub minute: u32,
}

/// Summarizer collaborator settings. The bot's decision logic never
/// depends on the summarizer; everything here only shapes the prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_chars: default_max_chars(),
            temperature: default_temperature(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone name for all day/week arithmetic
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Daily reminder sweep (DMs to opted-in users)
    #[serde(default = "default_reminder_time")]
    pub reminder_time: JobTime,
    /// Daily digest post
    #[serde(default = "default_digest_time")]
    pub digest_time: JobTime,
    /// Daily reaction check-in post
    #[serde(default = "default_post_time")]
    pub post_time: JobTime,
    /// Channel receiving the daily digest
    #[serde(default = "default_updates_channel")]
    pub updates_channel: String,
    /// Channel receiving the reaction check-in post
    #[serde(default = "default_checkins_channel")]
    pub checkins_channel: String,
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            reminder_time: default_reminder_time(),
            digest_time: default_digest_time(),
            post_time: default_post_time(),
            updates_channel: default_updates_channel(),
            checkins_channel: default_checkins_channel(),
            ai: AiConfig::default(),
        }
    }
}

fn default_timezone() -> String {
    week::DEFAULT_TIMEZONE.to_string()
}

fn default_reminder_time() -> JobTime {
    JobTime {
        hour: 20,
        minute: 30,
    }
}

fn default_digest_time() -> JobTime {
    JobTime { hour: 8, minute: 0 }
}

fn default_post_time() -> JobTime {
    JobTime { hour: 6, minute: 0 }
}

fn default_updates_channel() -> String {
    "updates".to_string()
}

fn default_checkins_channel() -> String {
    "check-ins".to_string()
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_chars() -> usize {
    180
}

fn default_temperature() -> f32 {
    0.6
}

impl Config {
    /// Load from `<dir>/config.toml`, falling back to defaults when the
    /// file is absent.
    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        let path = dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&text).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save to `<dir>/config.toml`.
    pub fn save_to(&self, dir: &std::path::Path) -> Result<()> {
        let path = dir.join("config.toml");
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from(&path),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The configured timezone, validated.
    pub fn tz(&self) -> Result<Tz> {
        week::parse_timezone(&self.timezone)
    }
}
