//! Campaign lifecycle: view-model, creation draft, template selection and
//! progress polling.

pub mod core;
pub mod form;
pub mod poller;
pub mod templates;
pub mod view_model;

pub use form::{CampaignDraft, ValidationError};
pub use poller::PollerRegistry;
pub use templates::{default_template, filter_templates, render_linkedin_preview};
pub use view_model::{CampaignError, CampaignViewModel};
