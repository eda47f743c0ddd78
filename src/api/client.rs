//! Outreach API Client
//!
//! JSON-over-HTTP client for the outreach backend.

use crate::api::OutreachApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::http;
use crate::models::{
    AdminStats, CalendlyEventType, CalendlyUser, Campaign, CampaignPreview, CampaignQuery, Club,
    Contact, DiscoveryRequest, EventTypeList, NewCampaign, PreviewRequest, Progress,
    ScheduledEvent, ScheduledEventList, Template,
};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// User-Agent string with console version
const USER_AGENT: &str = concat!("outreach-console/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        Self::handle_response_status(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like [`Self::decode`] but tolerates an empty body.
    async fn decode_value(response: Response) -> Result<Value, ApiError> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.build_url(endpoint));
        let response = Self::send(request).await?;
        Self::decode(response).await
    }

    async fn get_request_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.build_url(endpoint)).query(query);
        let response = Self::send(request).await?;
        Self::decode(response).await
    }

    async fn post_request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.build_url(endpoint)).json(body);
        let response = Self::send(request).await?;
        Self::decode(response).await
    }

    /// POST with neither body nor parameters.
    async fn post_empty(&self, endpoint: &str) -> Result<Value, ApiError> {
        let request = self.client.post(self.build_url(endpoint));
        let response = Self::send(request).await?;
        Self::decode_value(response).await
    }

    /// POST without a body; parameters travel in the query string.
    async fn post_query<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<Value, ApiError> {
        let request = self.client.post(self.build_url(endpoint)).query(query);
        let response = Self::send(request).await?;
        Self::decode_value(response).await
    }
}

#[async_trait::async_trait]
impl OutreachApi for ApiClient {
    async fn list_campaigns(&self, query: &CampaignQuery) -> Result<Vec<Campaign>, ApiError> {
        self.get_request_with_query("campaigns", query).await
    }

    async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Value, ApiError> {
        self.post_request("campaigns", campaign).await
    }

    async fn start_campaign(&self, id: u64) -> Result<(), ApiError> {
        self.post_empty(&format!("campaigns/{}/start", id))
            .await
            .map(|_| ())
    }

    async fn delete_campaign(&self, id: u64) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.build_url(&format!("campaigns/{}", id)));
        Self::send(request).await?;
        Ok(())
    }

    async fn preview_campaign(
        &self,
        request: &PreviewRequest,
    ) -> Result<CampaignPreview, ApiError> {
        self.post_request("campaigns/preview", request).await
    }

    async fn campaign_progress(&self, id: u64) -> Result<Progress, ApiError> {
        self.get_request(&format!("campaigns/{}/progress", id))
            .await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        self.get_request("templates").await
    }

    async fn import_templates(&self) -> Result<Value, ApiError> {
        self.post_empty("admin/import-templates").await
    }

    async fn kpi_summary(&self) -> Result<Value, ApiError> {
        self.get_request("kpis/summary").await
    }

    async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get_request("admin/stats").await
    }

    async fn rate_limits(&self) -> Result<Value, ApiError> {
        self.get_request("rate-limits").await
    }

    async fn list_contacts(&self, contact_type: Option<String>) -> Result<Vec<Contact>, ApiError> {
        let query: Vec<(&str, String)> = contact_type
            .map(|t| vec![("contact_type", t)])
            .unwrap_or_default();
        self.get_request_with_query("contacts", &query).await
    }

    async fn list_clubs(&self) -> Result<Vec<Club>, ApiError> {
        self.get_request("clubs").await
    }

    async fn discover_contacts(&self, request: &DiscoveryRequest) -> Result<Value, ApiError> {
        self.post_query("admin/discover-contacts", request).await
    }

    async fn send_test_email(&self, to: &str) -> Result<Value, ApiError> {
        self.post_query("admin/test-email", &[("to", to)]).await
    }

    async fn send_test_linkedin(
        &self,
        profile_url: &str,
        message: Option<String>,
    ) -> Result<Value, ApiError> {
        let mut query = vec![("profile_url", profile_url.to_string())];
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            query.push(("message", message));
        }
        self.post_query("admin/test-linkedin", &query).await
    }

    async fn trigger_linkedin_queue(&self) -> Result<Value, ApiError> {
        self.post_empty("admin/trigger-linkedin-queue").await
    }

    async fn calendly_user(&self) -> Result<CalendlyUser, ApiError> {
        self.get_request("calendly/user").await
    }

    async fn calendly_event_types(&self) -> Result<Vec<CalendlyEventType>, ApiError> {
        let list: EventTypeList = self.get_request("calendly/event-types").await?;
        Ok(list.event_types)
    }

    async fn calendly_scheduled_events(&self) -> Result<Vec<ScheduledEvent>, ApiError> {
        let list: ScheduledEventList = self.get_request("calendly/scheduled-events").await?;
        Ok(list.events)
    }
}

#[cfg(test)]
/// These are ignored by default since they require a running backend.
mod live_backend_tests {
    use super::*;
    use crate::environment::Environment;

    fn client() -> ApiClient {
        ApiClient::new(Environment::Local.api_url()).unwrap()
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should list campaigns.
    async fn test_list_campaigns() {
        match client().list_campaigns(&CampaignQuery::default()).await {
            Ok(campaigns) => println!("Got {} campaigns", campaigns.len()),
            Err(e) => panic!("Failed to list campaigns: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should list templates.
    async fn test_list_templates() {
        match client().list_templates().await {
            Ok(templates) => {
                for template in templates {
                    println!("Template: {}", template);
                }
            }
            Err(e) => panic!("Failed to list templates: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should return admin statistics.
    async fn test_admin_stats() {
        match client().admin_stats().await {
            Ok(stats) => println!("Contacts: {}", stats.total_contacts),
            Err(e) => panic!("Failed to fetch stats: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_slashes() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(
            client.build_url("/campaigns/4/progress"),
            "http://localhost:8000/api/campaigns/4/progress"
        );
        assert_eq!(client.base_url(), "http://localhost:8000/api/");
    }

    #[tokio::test]
    /// Requests to a closed port surface as transport errors, not panics.
    async fn test_unreachable_backend_is_an_error() {
        let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        let result = client.campaign_progress(1).await;
        assert!(matches!(result, Err(ApiError::Reqwest(_))));
    }
}
