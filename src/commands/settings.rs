//! `outreach settings ...`
//!
//! Settings are stored in the local config file only; the backend has no
//! endpoint for them.

use crate::cli_messages::print_field;
use crate::config::Config;
use crate::{handle_cmd_error, print_cmd_info, print_cmd_success};
use std::error::Error;
use std::path::Path;

/// Fields accepted by `settings set`. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub daily_email_limit: Option<u32>,
    pub daily_linkedin_limit: Option<u32>,
    pub auto_follow_up: Option<bool>,
    pub api_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub attachment_path: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.sender_name.is_none()
            && self.sender_email.is_none()
            && self.daily_email_limit.is_none()
            && self.daily_linkedin_limit.is_none()
            && self.auto_follow_up.is_none()
            && self.api_url.is_none()
            && self.poll_interval_secs.is_none()
            && self.attachment_path.is_none()
    }

    fn apply(self, config: &mut Config) {
        let settings = &mut config.settings;
        if let Some(name) = self.sender_name {
            settings.sender_name = name;
        }
        if let Some(email) = self.sender_email {
            settings.sender_email = email;
        }
        if let Some(limit) = self.daily_email_limit {
            settings.daily_email_limit = limit;
        }
        if let Some(limit) = self.daily_linkedin_limit {
            settings.daily_linkedin_limit = limit;
        }
        if let Some(enabled) = self.auto_follow_up {
            settings.auto_follow_up = enabled;
        }
        if let Some(url) = self.api_url {
            // An empty value clears the override.
            config.api_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secs) = self.poll_interval_secs {
            config.poll_interval_secs = secs.max(1);
        }
        if let Some(path) = self.attachment_path {
            config.attachment_path = path;
        }
    }
}

pub fn show(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to load config."))?;
    print_config(&config, config_path);
    Ok(())
}

pub fn set(config_path: &Path, update: SettingsUpdate) -> Result<(), Box<dyn Error>> {
    if update.is_empty() {
        print_cmd_info!(
            "Nothing to change.",
            "See: outreach settings set --help"
        );
        return Ok(());
    }
    let mut config = Config::load_or_default(config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to load config."))?;
    update.apply(&mut config);
    config
        .save(config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to save config."))?;
    print_cmd_success!("Settings saved.", "{}", config_path.display());
    print_config(&config, config_path);
    Ok(())
}

/// Removes the config file, returning every setting to its default.
pub fn reset(config_path: &Path) -> Result<(), Box<dyn Error>> {
    Config::clear(config_path).map_err(|e| handle_cmd_error!(e, "Failed to remove config."))?;
    print_cmd_success!("Settings reset.", "Removed {}", config_path.display());
    Ok(())
}

fn print_config(config: &Config, config_path: &Path) {
    print_cmd_info!("Settings", "{}", config_path.display());
    let settings = &config.settings;
    print_field("Sender name", &settings.sender_name);
    print_field(
        "Sender email",
        if settings.sender_email.is_empty() {
            "(not set)"
        } else {
            settings.sender_email.as_str()
        },
    );
    print_field("Daily email limit", settings.daily_email_limit);
    print_field("Daily LinkedIn limit", settings.daily_linkedin_limit);
    print_field("Auto follow-up", settings.auto_follow_up);
    print_field(
        "API URL",
        config.api_url.as_deref().unwrap_or("(environment default)"),
    );
    print_field("Poll interval", format!("{}s", config.poll_interval().as_secs()));
    print_field("Attachment", &config.attachment_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_only_touches_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        set(
            &path,
            SettingsUpdate {
                daily_email_limit: Some(80),
                api_url: Some("http://10.0.0.2:8000/api".to_string()),
                ..SettingsUpdate::default()
            },
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.settings.daily_email_limit, 80);
        assert_eq!(config.settings.daily_linkedin_limit, 20);
        assert_eq!(config.api_url.as_deref(), Some("http://10.0.0.2:8000/api"));
    }

    #[test]
    fn test_empty_api_url_clears_override() {
        let mut config = Config {
            api_url: Some("http://old".to_string()),
            ..Config::default()
        };
        SettingsUpdate {
            api_url: Some(" ".to_string()),
            poll_interval_secs: Some(0),
            ..SettingsUpdate::default()
        }
        .apply(&mut config);
        assert_eq!(config.api_url, None);
        assert_eq!(config.poll_interval_secs, 1);
    }

    #[test]
    fn test_empty_update_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        set(&path, SettingsUpdate::default()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_reset_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::default().save(&path).unwrap();
        reset(&path).unwrap();
        assert!(!path.exists());
        reset(&path).unwrap();
    }
}
