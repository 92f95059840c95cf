//! Configuration management
//!
//! Settings live in `~/.comunica/config.json`: the speech locale and
//! optional command templates for the speech and camera collaborators.
//! A missing file loads the defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale tag passed to the speech synthesizer
    pub locale: String,

    /// Speech command template; `{text}` and `{locale}` are substituted.
    /// When unset, platform synthesizers are probed in order.
    pub speech_command: Option<String>,

    /// Camera capture command template; `{output}` and `{facing}` are
    /// substituted. When unset, a platform default is used.
    pub camera_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".to_string(),
            speech_command: None,
            camera_command: None,
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads from an explicit path (missing file means defaults).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Writes the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Writes to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Default config file path (`~/.comunica/config.json`).
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".comunica");

        Ok(config_dir.join("config.json"))
    }

    /// Reads a setting by key name (for `config get`).
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "locale" => Ok(self.locale.clone()),
            "speech_command" => Ok(self.speech_command.clone().unwrap_or_default()),
            "camera_command" => Ok(self.camera_command.clone().unwrap_or_default()),
            other => bail!("Unknown config key '{other}'. Valid keys: locale, speech_command, camera_command"),
        }
    }

    /// Writes a setting by key name (for `config set`).
    ///
    /// An empty value clears the optional command templates.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "locale" => {
                if value.trim().is_empty() {
                    bail!("locale cannot be empty");
                }
                self.locale = value.trim().to_string();
            }
            "speech_command" => {
                self.speech_command = non_empty(value);
            }
            "camera_command" => {
                self.camera_command = non_empty(value);
            }
            other => bail!("Unknown config key '{other}'. Valid keys: locale, speech_command, camera_command"),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
