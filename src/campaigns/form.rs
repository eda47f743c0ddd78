//! Campaign creation draft

use crate::models::{Channel, ContactCategory, NewCampaign, PreviewRequest};
use thiserror::Error;

/// A required selection is missing; caught before any request is made.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a template")]
    MissingTemplate,

    #[error("Please select a target category")]
    MissingCategory,
}

/// Unsaved state of the creation form. Discarded on submit or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDraft {
    pub name: String,
    pub channel: Channel,
    pub template_id: Option<u64>,
    pub category: Option<ContactCategory>,
    /// Only honoured for e-mail campaigns.
    pub attach_pdf: bool,
}

impl Default for CampaignDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            channel: Channel::Email,
            template_id: None,
            category: None,
            attach_pdf: true,
        }
    }
}

impl CampaignDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Switching channel invalidates the template choice.
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
        self.template_id = None;
        self.attach_pdf = channel == Channel::Email;
    }

    pub fn preview_request(&self) -> Result<PreviewRequest, ValidationError> {
        let template_id = self.template_id.ok_or(ValidationError::MissingTemplate)?;
        let target_contact_type = self.category.ok_or(ValidationError::MissingCategory)?;
        Ok(PreviewRequest {
            template_id,
            target_contact_type,
        })
    }

    /// Request body for `POST /campaigns`. The deck at `attachment_path` is
    /// attached only to e-mail campaigns with the flag set.
    pub fn to_request(&self, attachment_path: &str) -> Result<NewCampaign, ValidationError> {
        let template_id = self.template_id.ok_or(ValidationError::MissingTemplate)?;
        let attachment_path = (self.channel == Channel::Email && self.attach_pdf)
            .then(|| attachment_path.to_string());
        Ok(NewCampaign {
            name: self.name.clone(),
            campaign_type: self.channel,
            template_id,
            target_contact_type: self.category,
            attachment_path,
        })
    }
}
