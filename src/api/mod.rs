use crate::api::error::ApiError;
use crate::models::{
    AdminStats, CalendlyEventType, CalendlyUser, Campaign, CampaignPreview, CampaignQuery, Club,
    Contact, DiscoveryRequest, NewCampaign, PreviewRequest, Progress, ScheduledEvent, Template,
};
use serde_json::Value;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod error_handler;

#[cfg(test)]
use mockall::automock;

/// The outreach backend as seen by the console.
///
/// Opaque payloads (KPIs, rate limits, discovery results) are returned as
/// raw JSON because their shape belongs to the backend.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait OutreachApi: Send + Sync {
    /// Fetches campaigns, optionally filtered by status or channel.
    async fn list_campaigns(&self, query: &CampaignQuery) -> Result<Vec<Campaign>, ApiError>;

    /// Creates a campaign in `draft` status.
    async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Value, ApiError>;

    /// Moves a draft campaign to `active`; the backend starts queuing messages.
    async fn start_campaign(&self, id: u64) -> Result<(), ApiError>;

    /// Deletes a campaign along with its queued messages.
    async fn delete_campaign(&self, id: u64) -> Result<(), ApiError>;

    /// Renders a campaign's first message without creating anything.
    async fn preview_campaign(&self, request: &PreviewRequest)
    -> Result<CampaignPreview, ApiError>;

    /// Current delivery counters for a campaign.
    async fn campaign_progress(&self, id: u64) -> Result<Progress, ApiError>;

    async fn list_templates(&self) -> Result<Vec<Template>, ApiError>;

    /// Seeds the default templates on the backend.
    async fn import_templates(&self) -> Result<Value, ApiError>;

    async fn kpi_summary(&self) -> Result<Value, ApiError>;

    async fn admin_stats(&self) -> Result<AdminStats, ApiError>;

    /// Per-channel daily and hourly sending limits.
    async fn rate_limits(&self) -> Result<Value, ApiError>;

    async fn list_contacts(&self, contact_type: Option<String>) -> Result<Vec<Contact>, ApiError>;

    async fn list_clubs(&self) -> Result<Vec<Club>, ApiError>;

    /// Runs contact discovery on the backend and returns its summary.
    async fn discover_contacts(&self, request: &DiscoveryRequest) -> Result<Value, ApiError>;

    async fn send_test_email(&self, to: &str) -> Result<Value, ApiError>;

    async fn send_test_linkedin(
        &self,
        profile_url: &str,
        message: Option<String>,
    ) -> Result<Value, ApiError>;

    /// Asks the backend to process its LinkedIn queue now.
    async fn trigger_linkedin_queue(&self) -> Result<Value, ApiError>;

    /// The Calendly account the backend's token belongs to.
    async fn calendly_user(&self) -> Result<CalendlyUser, ApiError>;

    async fn calendly_event_types(&self) -> Result<Vec<CalendlyEventType>, ApiError>;

    /// Booked meetings, past and upcoming.
    async fn calendly_scheduled_events(&self) -> Result<Vec<ScheduledEvent>, ApiError>;
}
