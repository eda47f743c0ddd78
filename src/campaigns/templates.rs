//! Template selection for the campaign form

use crate::consts::cli_consts::linkedin_preview::{SAMPLE_COLLEGE, SAMPLE_NAME};
use crate::models::{Channel, ContactCategory, Template};

/// Word a template name must contain to be picked as the first e-mail of a
/// sequence.
const INITIAL_MARKER: &str = "initial";

/// Templates usable for a campaign on `channel`, optionally narrowed to an
/// audience.
pub fn filter_templates<'a>(
    templates: &'a [Template],
    channel: Channel,
    category: Option<ContactCategory>,
) -> Vec<&'a Template> {
    templates
        .iter()
        .filter(|t| matches_channel(t, channel))
        .filter(|t| category.is_none_or(|c| matches_category(t, c)))
        .collect()
}

/// Template pre-selected when an audience is picked. `None` clears the
/// current selection.
pub fn default_template(
    templates: &[Template],
    channel: Channel,
    category: ContactCategory,
) -> Option<&Template> {
    match channel {
        Channel::Linkedin => templates.iter().find(|t| t.channel() == Channel::Linkedin),
        Channel::Email => templates.iter().find(|t| {
            t.channel() == Channel::Email
                && matches_category(t, category)
                && t.name().to_lowercase().contains(INITIAL_MARKER)
        }),
    }
}

/// LinkedIn messages are not rendered by the backend; substitute the sample
/// recipient locally.
pub fn render_linkedin_preview(body: &str) -> String {
    body.replace("{{name}}", SAMPLE_NAME)
        .replace("{{college}}", SAMPLE_COLLEGE)
}

fn matches_channel(template: &Template, channel: Channel) -> bool {
    template.channel() == channel
}

fn matches_category(template: &Template, category: ContactCategory) -> bool {
    if template.has_explicit_category() {
        return template.category() == Some(category);
    }
    name_mentions(template.name(), category)
}

/// Fallback for templates without an audience attribute: the name contains
/// the category token, either as is or with spaces for underscores.
fn name_mentions(name: &str, category: ContactCategory) -> bool {
    let name = name.to_lowercase();
    let token = category.token();
    name.contains(token) || name.contains(&token.replace('_', " "))
}
