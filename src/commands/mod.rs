//! One-shot console commands.
//!
//! Each command prints its result with the `print_cmd_*` macros and returns
//! the error to `main` after reporting it.

pub mod admin;
pub mod calendly;
pub mod campaigns;
pub mod settings;
pub mod templates;

use crate::api::{ApiClient, OutreachApi};
use crate::campaigns::CampaignViewModel;
use crate::config::Config;
use crate::environment::Environment;
use log::debug;
use std::error::Error;
use std::sync::Arc;

/// What every backend-facing command needs.
pub struct CommandContext {
    pub api: Arc<dyn OutreachApi>,
    /// Base URL the client talks to.
    pub api_url: String,
    pub config: Config,
}

impl CommandContext {
    /// Builds the HTTP client for the resolved API URL. `api_url` comes from
    /// the command line and wins over every other source.
    pub fn connect(
        config: Config,
        environment: Environment,
        api_url: Option<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let base_url = api_url.unwrap_or_else(|| config.resolve_api_url(environment));
        debug!("Using outreach API at {}", base_url);
        let client = ApiClient::new(base_url.clone())?;
        Ok(Self {
            api: Arc::new(client),
            api_url: base_url,
            config,
        })
    }

    pub fn view_model(&self) -> CampaignViewModel {
        CampaignViewModel::new(
            Arc::clone(&self.api),
            self.config.poll_interval(),
            self.config.attachment_path.clone(),
        )
    }
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
