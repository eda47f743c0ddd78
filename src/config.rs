//! Application configuration.
//!
//! Everything here is local to the machine running the console. The backend
//! exposes no settings endpoint, so [`Settings`] is never sent anywhere.

use crate::consts::cli_consts::{DEFAULT_ATTACHMENT_PATH, polling};
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

/// Environment variable that overrides every other source of the API URL.
pub const API_URL_ENV: &str = "OUTREACH_API_URL";

/// Environment variable selecting a predefined [`Environment`].
pub const ENVIRONMENT_ENV: &str = "OUTREACH_ENVIRONMENT";

/// Outreach preferences shown on the settings screen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub sender_name: String,
    pub sender_email: String,
    pub daily_email_limit: u32,
    pub daily_linkedin_limit: u32,
    pub auto_follow_up: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sender_name: "TransferX Team".to_string(),
            sender_email: String::new(),
            daily_email_limit: 50,
            daily_linkedin_limit: 20,
            auto_follow_up: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Overrides the environment's API URL when set.
    pub api_url: Option<String>,
    /// Seconds between progress fetches for a running campaign.
    pub poll_interval_secs: u64,
    /// Document attached to e-mail campaigns when the attach flag is set.
    pub attachment_path: String,
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            poll_interval_secs: polling::INTERVAL_SECS,
            attachment_path: DEFAULT_ATTACHMENT_PATH.to_string(),
            settings: Settings::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Resolves the API base URL: env override, then config file, then environment.
    pub fn resolve_api_url(&self, environment: Environment) -> String {
        env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| environment.api_url())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Path of the config file under the user's home directory.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home.join(".outreach").join("config.json"))
}
