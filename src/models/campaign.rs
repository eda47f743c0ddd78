//! Campaign DTOs
//!
//! The backend owns every campaign; these are read-only snapshots plus the
//! request bodies the console sends.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::{AsRefStr, EnumString};

/// Delivery channel of a campaign or template.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Channel {
    #[default]
    Email,
    Linkedin,
}

impl Channel {
    /// Loose parse used for DTO fields: anything other than `linkedin` is e-mail.
    pub fn from_loose(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("linkedin") => Channel::Linkedin,
            _ => Channel::Email,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Email => "Email",
            Channel::Linkedin => "LinkedIn",
        }
    }
}

/// Audience segment a campaign targets.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ContactCategory {
    Club,
    Professor,
    TransferCenter,
    International,
    President,
    StudentGovt,
}

impl ContactCategory {
    /// Token used in template names and on the wire, e.g. `transfer_center`.
    pub fn token(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactCategory::Club => "Clubs",
            ContactCategory::Professor => "Professors",
            ContactCategory::TransferCenter => "Transfer Centers",
            ContactCategory::International => "International Offices",
            ContactCategory::President => "College Presidents",
            ContactCategory::StudentGovt => "Student Government",
        }
    }
}

/// Campaign lifecycle as reported by the backend.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
    /// Any status this console does not know about yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub campaign_type: Option<String>,
    #[serde(default)]
    pub target_contact_type: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub attachment_path: Option<String>,
    #[serde(default)]
    pub sent_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Campaign {
    pub fn channel(&self) -> Channel {
        Channel::from_loose(self.campaign_type.as_deref())
    }

    pub fn category(&self) -> Option<ContactCategory> {
        self.target_contact_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }

    /// Human label of the audience: known category label, raw value, or "All".
    pub fn audience_label(&self) -> String {
        if let Some(category) = self.category() {
            return category.label().to_string();
        }
        match self.target_contact_type.as_deref() {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => "All".to_string(),
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent_count.unwrap_or(0)
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment_path
            .as_deref()
            .is_some_and(|path| !path.is_empty())
    }
}

/// Query parameters accepted by `GET /campaigns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<Channel>,
}

/// Body of `POST /campaigns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCampaign {
    pub name: String,
    pub campaign_type: Channel,
    pub template_id: u64,
    pub target_contact_type: Option<ContactCategory>,
    pub attachment_path: Option<String>,
}

/// Body of `POST /campaigns/preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRequest {
    pub template_id: u64,
    pub target_contact_type: ContactCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
}

impl Display for SampleContact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name.as_deref().unwrap_or("unknown"),
            self.college.as_deref().unwrap_or("unknown college")
        )
    }
}

/// Dry-run rendering of a campaign's first message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPreview {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub total_recipients: u64,
    #[serde(default)]
    pub sample_contact: Option<SampleContact>,
}
