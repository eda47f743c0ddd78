//! Campaign view-model
//!
//! Holds the console's copy of the campaign and template lists, drives the
//! create / preview / start / delete workflow and keeps one progress poller
//! per active campaign. The backend stays authoritative: every mutation is
//! followed by a reload rather than a local edit.

use super::core::{EventSender, ProgressBoard};
use super::form::{CampaignDraft, ValidationError};
use super::poller::PollerRegistry;
use super::templates::{default_template, filter_templates, render_linkedin_preview};
use crate::api::OutreachApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::events::{Event, EventType};
use crate::models::{
    Campaign, CampaignPreview, CampaignQuery, Channel, ContactCategory, Progress, Template,
};
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend refused; the message is shown to the user verbatim.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

pub struct CampaignViewModel {
    api: Arc<dyn OutreachApi>,
    campaigns: Vec<Campaign>,
    templates: Vec<Template>,
    loading: bool,
    board: ProgressBoard,
    pollers: PollerRegistry,
    events: mpsc::Receiver<Event>,
    form: Option<CampaignDraft>,
    preview: Option<CampaignPreview>,
    /// Deck path sent with e-mail campaigns; resolved on the backend host.
    attachment_path: String,
}

impl CampaignViewModel {
    /// Must be called from within a tokio runtime.
    pub fn new(
        api: Arc<dyn OutreachApi>,
        poll_interval: Duration,
        attachment_path: impl Into<String>,
    ) -> Self {
        let (sender, events) = mpsc::channel(EVENT_QUEUE_SIZE);
        let board = ProgressBoard::new();
        let pollers = PollerRegistry::new(
            Arc::clone(&api),
            board.clone(),
            EventSender::new(sender),
            poll_interval,
        );
        Self {
            api,
            campaigns: Vec::new(),
            templates: Vec::new(),
            loading: true,
            board,
            pollers,
            events,
            form: None,
            preview: None,
            attachment_path: attachment_path.into(),
        }
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Replaces the campaign list and makes sure every active campaign is
    /// polled. A failed fetch keeps the last known list.
    pub async fn load_campaigns(&mut self) {
        match self.api.list_campaigns(&CampaignQuery::default()).await {
            Ok(campaigns) => {
                debug!("Loaded {} campaigns", campaigns.len());
                self.campaigns = campaigns;
                let active: Vec<u64> = self
                    .campaigns
                    .iter()
                    .filter(|c| c.is_active())
                    .map(|c| c.id)
                    .collect();
                for id in active {
                    self.start_polling(id);
                }
            }
            Err(e) => warn!("Failed to load campaigns: {}", e),
        }
        self.loading = false;
    }

    /// A failed fetch keeps the previous templates.
    pub async fn load_templates(&mut self) {
        match self.api.list_templates().await {
            Ok(templates) => {
                debug!("Loaded {} templates", templates.len());
                self.templates = templates;
            }
            Err(e) => warn!("Failed to load templates: {}", e),
        }
    }

    /// Seeds the backend's default templates, then reloads them.
    pub async fn import_templates(&mut self) -> Result<Value, CampaignError> {
        let summary = self.api.import_templates().await?;
        self.load_templates().await;
        Ok(summary)
    }

    // ---------------------------------------------------------------------
    // Polling
    // ---------------------------------------------------------------------

    /// No-op when the campaign is already polled.
    pub fn start_polling(&self, campaign_id: u64) -> bool {
        self.pollers.start(campaign_id)
    }

    pub fn is_polling(&self, campaign_id: u64) -> bool {
        self.pollers.is_polling(campaign_id)
    }

    pub fn polling_ids(&self) -> Vec<u64> {
        self.pollers.active_ids()
    }

    /// Latest snapshot fetched for the campaign, if any.
    pub fn progress(&self, campaign_id: u64) -> Option<Progress> {
        self.board.get(campaign_id)
    }

    /// Waits for the next poller event.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Reacts to a poller event: a finished campaign triggers a reload so
    /// its terminal status shows up.
    pub async fn handle_event(&mut self, event: &Event) {
        if event.event_type == EventType::Completed {
            info!("{}", event.msg);
            self.load_campaigns().await;
        }
    }

    /// Drains queued poller events without waiting and returns them. Reloads
    /// once if any of them reports a finished campaign.
    pub async fn process_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        if let Some(completed) = drained
            .iter()
            .find(|e| e.event_type == EventType::Completed)
        {
            let completed = completed.clone();
            self.handle_event(&completed).await;
        }
        drained
    }

    /// Cancels every poller. Dropping the view-model does the same.
    pub fn dispose(&self) {
        self.pollers.dispose();
    }

    // ---------------------------------------------------------------------
    // Creation form
    // ---------------------------------------------------------------------

    pub fn open_form(&mut self, name: impl Into<String>) {
        self.form = Some(CampaignDraft::new(name));
        self.preview = None;
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.preview = None;
    }

    pub fn form(&self) -> Option<&CampaignDraft> {
        self.form.as_ref()
    }

    /// The open draft, opening an unnamed one if needed.
    pub fn draft_mut(&mut self) -> &mut CampaignDraft {
        self.form.get_or_insert_with(CampaignDraft::default)
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.draft_mut().set_channel(channel);
        self.preview = None;
    }

    /// Sets the audience and pre-selects the matching template, clearing
    /// the selection when nothing matches.
    pub fn select_category(&mut self, category: ContactCategory) {
        let channel = self.draft_mut().channel;
        let template_id = default_template(&self.templates, channel, category).map(|t| t.id);
        let draft = self.draft_mut();
        draft.category = Some(category);
        draft.template_id = template_id;
        self.preview = None;
    }

    pub fn select_template(&mut self, template_id: u64) {
        self.draft_mut().template_id = Some(template_id);
        self.preview = None;
    }

    /// Templates offered for the open draft's channel and audience.
    pub fn filtered_templates(&self) -> Vec<&Template> {
        let (channel, category) = self
            .form
            .as_ref()
            .map(|d| (d.channel, d.category))
            .unwrap_or_default();
        filter_templates(&self.templates, channel, category)
    }

    pub fn selected_template(&self) -> Option<&Template> {
        let id = self.form.as_ref()?.template_id?;
        self.templates.iter().find(|t| t.id == id)
    }

    /// Local rendering of the selected LinkedIn template with a sample
    /// recipient. `None` for e-mail drafts.
    pub fn linkedin_preview(&self) -> Option<String> {
        let draft = self.form.as_ref()?;
        if draft.channel != Channel::Linkedin {
            return None;
        }
        let body = self.selected_template()?.body_text.as_deref().unwrap_or("");
        Some(render_linkedin_preview(body))
    }

    pub fn preview(&self) -> Option<&CampaignPreview> {
        self.preview.as_ref()
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Dry-run rendering of the draft's first message. Creates nothing.
    pub async fn preview_campaign(&mut self) -> Result<CampaignPreview, CampaignError> {
        let request = self
            .form
            .as_ref()
            .ok_or(ValidationError::MissingTemplate)?
            .preview_request()?;
        let preview = self.api.preview_campaign(&request).await?;
        self.preview = Some(preview.clone());
        Ok(preview)
    }

    /// Submits the draft. On success the form is closed and the list
    /// reloaded; on failure the draft stays open untouched.
    pub async fn create_campaign(&mut self) -> Result<Value, CampaignError> {
        let request = self
            .form
            .as_ref()
            .ok_or(ValidationError::MissingTemplate)?
            .to_request(&self.attachment_path)?;
        let created = self.api.create_campaign(&request).await?;
        info!("Created campaign {:?}", request.name);
        self.cancel_form();
        self.load_campaigns().await;
        Ok(created)
    }

    /// Activates a draft campaign and begins polling it. Takes `&mut self`,
    /// so no second start can be issued while one is in flight.
    pub async fn start_campaign(&mut self, campaign_id: u64) -> Result<(), CampaignError> {
        self.api.start_campaign(campaign_id).await?;
        info!("Started campaign {}", campaign_id);
        self.start_polling(campaign_id);
        self.load_campaigns().await;
        Ok(())
    }

    /// Deletes a campaign. Its poller is cancelled before the request goes
    /// out and restored if the backend refuses.
    pub async fn delete_campaign(&mut self, campaign_id: u64) -> Result<(), CampaignError> {
        let was_polling = self.pollers.stop(campaign_id);
        if let Err(e) = self.api.delete_campaign(campaign_id).await {
            if was_polling {
                self.start_polling(campaign_id);
            }
            return Err(e.into());
        }
        self.board.remove(campaign_id);
        info!("Deleted campaign {}", campaign_id);
        self.load_campaigns().await;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn campaign(&self, campaign_id: u64) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == campaign_id)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// `true` until the first campaign load has finished.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn active_count(&self) -> usize {
        self.campaigns.iter().filter(|c| c.is_active()).count()
    }

    pub fn total_sent(&self) -> u64 {
        self.campaigns.iter().map(Campaign::sent).sum()
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}
