//! Backend DTOs

pub mod calendly;
pub mod campaign;
pub mod contact;
pub mod template;

pub use calendly::{
    CalendlyEventType, CalendlyUser, EventTypeList, ScheduledEvent, ScheduledEventList,
};
pub use campaign::{
    Campaign, CampaignPreview, CampaignQuery, CampaignStatus, Channel, ContactCategory,
    NewCampaign, PreviewRequest, SampleContact,
};
pub use contact::{AdminStats, Club, Contact, DiscoveryRequest};
pub use template::{Progress, Template};
