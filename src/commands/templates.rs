//! `outreach templates ...`

use super::{CommandContext, truncate};
use crate::campaigns::filter_templates;
use crate::models::{Channel, ContactCategory, Template};
use crate::{handle_cmd_error, print_cmd_error, print_cmd_info, print_cmd_success};
use std::error::Error;

pub async fn list(
    ctx: &CommandContext,
    channel: Option<Channel>,
    category: Option<ContactCategory>,
) -> Result<(), Box<dyn Error>> {
    let templates = ctx
        .api
        .list_templates()
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to list templates."))?;

    let shown: Vec<&Template> = match channel {
        Some(channel) => filter_templates(&templates, channel, category),
        None => [Channel::Email, Channel::Linkedin]
            .into_iter()
            .flat_map(|channel| filter_templates(&templates, channel, category))
            .collect(),
    };

    if shown.is_empty() {
        print_cmd_info!(
            "No matching templates.",
            "{} templates on the backend; seed the defaults with: outreach templates import",
            templates.len()
        );
        return Ok(());
    }

    println!(
        "{:>5}  {:<9} {:<18} {:<30} {}",
        "ID", "CHANNEL", "AUDIENCE", "NAME", "SUBJECT"
    );
    for template in shown {
        let audience = match (template.category(), template.has_explicit_category()) {
            (Some(category), _) => category.label().to_string(),
            (None, true) => template.target_contact_type.clone().unwrap_or_default(),
            (None, false) => "-".to_string(),
        };
        println!(
            "{:>5}  {:<9} {:<18} {:<30} {}",
            template.id,
            template.channel().label(),
            truncate(&audience, 18),
            truncate(template.name(), 30),
            template.subject.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// Seeds the backend's default templates.
pub async fn import(ctx: &CommandContext) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    match vm.import_templates().await {
        Ok(summary) => {
            let details = match summary.get("message").and_then(|m| m.as_str()) {
                Some(message) => message.to_string(),
                None => format!("{} templates available", vm.templates().len()),
            };
            print_cmd_success!("Templates imported.", "{}", details);
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Failed to import templates.", "{}", e);
            Err(e.into())
        }
    }
}
