//! `outreach campaigns ...`

use super::{CommandContext, truncate};
use crate::campaigns::CampaignViewModel;
use crate::cli_messages::print_field;
use crate::events::{Event, EventType};
use crate::models::{CampaignPreview, CampaignQuery, Channel, ContactCategory};
use crate::{handle_cmd_error, print_cmd_error, print_cmd_info, print_cmd_success, print_cmd_warn};
use log::warn;
use std::error::Error;

/// Options of `campaigns create`.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub name: String,
    pub channel: Channel,
    pub category: ContactCategory,
    /// Overrides the template picked for the category.
    pub template_id: Option<u64>,
    pub attach_pdf: bool,
    /// Show the backend's rendering before creating.
    pub preview: bool,
}

pub async fn list(ctx: &CommandContext, query: CampaignQuery) -> Result<(), Box<dyn Error>> {
    let campaigns = ctx
        .api
        .list_campaigns(&query)
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to list campaigns."))?;

    if campaigns.is_empty() {
        print_cmd_info!("No campaigns yet.", "Create one with: outreach campaigns create");
        return Ok(());
    }

    println!(
        "{:>5}  {:<28} {:<9} {:<22} {:<10} {:>6}",
        "ID", "NAME", "CHANNEL", "AUDIENCE", "STATUS", "SENT"
    );
    for campaign in &campaigns {
        println!(
            "{:>5}  {:<28} {:<9} {:<22} {:<10} {:>6}",
            campaign.id,
            truncate(&campaign.name, 28),
            campaign.channel().label(),
            truncate(&campaign.audience_label(), 22),
            campaign.status,
            campaign.sent()
        );
    }
    let active = campaigns.iter().filter(|c| c.is_active()).count();
    let sent: u64 = campaigns.iter().map(|c| c.sent()).sum();
    println!();
    print_cmd_info!(
        "Summary",
        "{} campaigns, {} active, {} messages sent",
        campaigns.len(),
        active,
        sent
    );
    Ok(())
}

/// Creates a campaign through the same draft workflow as the dashboard.
pub async fn create(ctx: &CommandContext, options: CreateOptions) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    vm.load_templates().await;
    if vm.templates().is_empty() {
        print_cmd_warn!(
            "No templates available.",
            "Seed the defaults with: outreach templates import"
        );
    }

    vm.open_form(options.name.clone());
    vm.set_channel(options.channel);
    vm.select_category(options.category);
    if let Some(template_id) = options.template_id {
        vm.select_template(template_id);
    }
    vm.draft_mut().attach_pdf = options.attach_pdf;

    if let Some(template) = vm.selected_template() {
        print_cmd_info!("Using template", "#{} {}", template.id, template);
    }

    if options.preview {
        show_preview(&mut vm).await?;
    }

    match vm.create_campaign().await {
        Ok(created) => {
            let id = created
                .get("id")
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".to_string());
            print_cmd_success!(
                "Campaign created.",
                "ID {} ({} draft). Start it with: outreach campaigns start {}",
                id,
                options.channel.label(),
                id
            );
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Failed to create campaign.", "{}", e);
            Err(e.into())
        }
    }
}

/// Renders a template for a category without creating anything.
pub async fn preview(
    ctx: &CommandContext,
    template_id: u64,
    category: ContactCategory,
) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    vm.load_templates().await;
    vm.open_form("");
    if let Some(channel) = vm
        .templates()
        .iter()
        .find(|t| t.id == template_id)
        .map(|t| t.channel())
    {
        vm.set_channel(channel);
    }
    vm.select_category(category);
    vm.select_template(template_id);
    show_preview(&mut vm).await
}

async fn show_preview(vm: &mut CampaignViewModel) -> Result<(), Box<dyn Error>> {
    if let Some(message) = vm.linkedin_preview() {
        print_cmd_info!("LinkedIn message preview", "");
        println!("{}", message);
        println!();
        return Ok(());
    }
    match vm.preview_campaign().await {
        Ok(preview) => {
            print_preview(&preview);
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Failed to preview campaign.", "{}", e);
            Err(e.into())
        }
    }
}

fn print_preview(preview: &CampaignPreview) {
    print_cmd_info!("Campaign preview", "");
    print_field("Subject", &preview.subject);
    print_field("Recipients", preview.total_recipients);
    if let Some(sample) = &preview.sample_contact {
        print_field("Sample contact", sample);
    }
    println!();
    println!("{}", preview.html);
    println!();
}

/// Starts a draft campaign, optionally following it until it finishes.
pub async fn start(ctx: &CommandContext, campaign_id: u64, follow: bool) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    if let Err(e) = vm.start_campaign(campaign_id).await {
        print_cmd_error!("Failed to start campaign.", "{}", e);
        return Err(e.into());
    }
    print_cmd_success!("Campaign started.", "Campaign {} is now sending", campaign_id);
    if follow {
        follow_progress(vm).await;
    } else {
        vm.dispose();
    }
    Ok(())
}

pub async fn delete(ctx: &CommandContext, campaign_id: u64) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    match vm.delete_campaign(campaign_id).await {
        Ok(()) => {
            print_cmd_success!("Campaign deleted.", "Campaign {} removed", campaign_id);
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Failed to delete campaign.", "{}", e);
            Err(e.into())
        }
    }
}

/// Follows progress of the given campaigns, or of every active one when
/// none are named, until they finish or Ctrl-C is pressed.
pub async fn watch(ctx: &CommandContext, campaign_ids: Vec<u64>) -> Result<(), Box<dyn Error>> {
    let mut vm = ctx.view_model();
    if campaign_ids.is_empty() {
        vm.load_campaigns().await;
    } else {
        for id in campaign_ids {
            vm.start_polling(id);
        }
    }
    if vm.polling_ids().is_empty() {
        print_cmd_info!("Nothing to watch.", "No campaign is currently active");
        return Ok(());
    }
    follow_progress(vm).await;
    Ok(())
}

/// Prints poller events until no campaign is polled any more. Returns the
/// number of campaigns seen finishing.
async fn follow_progress(mut vm: CampaignViewModel) -> usize {
    print_cmd_info!(
        "Watching campaigns",
        "{:?} (Ctrl-C to stop)",
        vm.polling_ids()
    );
    let mut finished = 0;
    loop {
        if vm.polling_ids().is_empty() {
            // Pollers queue their completion before giving up their slot.
            let queued = vm.process_events().await;
            finished += queued.iter().filter(|e| report_event(e)).count();
            if vm.polling_ids().is_empty() {
                break;
            }
            continue;
        }
        let event = tokio::select! {
            event = vm.next_event() => event,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(event) = event else { break };
        if report_event(&event) {
            finished += 1;
        }
        vm.handle_event(&event).await;
    }
    vm.dispose();
    finished
}

/// Prints one poller event. Returns `true` for a completion.
fn report_event(event: &Event) -> bool {
    match event.event_type {
        EventType::Progress => {
            if let (Some(id), Some(progress)) = (event.campaign_id, event.progress) {
                print_field(&format!("Campaign {}", id), progress);
            }
            false
        }
        EventType::Completed => {
            print_cmd_success!("Campaign finished.", "{}", event.msg);
            true
        }
        EventType::Error => {
            warn!("{}", event.msg);
            false
        }
        EventType::Action => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOutreachApi;
    use crate::models::Progress;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_follow_reports_every_completion() {
        let reloads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reloads);
        let mut mock = MockOutreachApi::new();
        mock.expect_campaign_progress().returning(|_| {
            Ok(Progress {
                total: 3,
                sent: 3,
                pending: 0,
                failed: 0,
            })
        });
        mock.expect_list_campaigns().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        });

        let vm = CampaignViewModel::new(Arc::new(mock), Duration::from_secs(5), "");
        vm.start_polling(1);
        vm.start_polling(2);

        assert_eq!(follow_progress(vm).await, 2);
        assert!(reloads.load(Ordering::SeqCst) >= 1);
    }
}
