//! Overview, contacts, discovery and test-message commands.
//!
//! Plain fetch-and-print views over the backend; none of them keep state.

use super::{CommandContext, truncate};
use crate::cli_messages::print_field;
use crate::models::{Contact, ContactCategory, DiscoveryRequest};
use crate::{handle_cmd_error, print_cmd_error, print_cmd_info, print_cmd_success, print_cmd_warn};
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

/// One window of a channel's sending limit, as reported by `/rate-limits`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct Usage {
    count: u64,
    limit: u64,
    remaining: Option<u64>,
}

impl Usage {
    fn remaining(&self) -> u64 {
        self.remaining
            .unwrap_or_else(|| self.limit.saturating_sub(self.count))
    }

    fn percent(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        (self.count.saturating_mul(100) / self.limit).min(100)
    }
}

/// `limits[channel][window]`, if the backend reported it.
fn usage(limits: &Value, channel: &str, window: &str) -> Option<Usage> {
    let raw = limits.get(channel)?.get(window)?;
    serde_json::from_value(raw.clone()).ok()
}

fn number(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.1}", f),
            _ => n.to_string(),
        },
        _ => "0".to_string(),
    }
}

/// KPIs, contact statistics and rate limits, fetched concurrently.
pub async fn overview(ctx: &CommandContext) -> Result<(), Box<dyn Error>> {
    let (kpis, stats, limits) = futures::join!(
        ctx.api.kpi_summary(),
        ctx.api.admin_stats(),
        ctx.api.rate_limits()
    );

    print_cmd_info!("Outreach overview", "");
    match kpis {
        Ok(kpis) => {
            print_field("Emails sent", number(&kpis, "emails_sent"));
            print_field("Responses", number(&kpis, "email_responses"));
            print_field(
                "Response rate",
                format!("{}%", number(&kpis, "email_response_rate")),
            );
            print_field("Meetings", number(&kpis, "meetings_scheduled"));
        }
        Err(e) => warn!("Failed to load KPIs: {}", e),
    }

    match stats {
        Ok(stats) => {
            print_field("Contacts", stats.total_contacts);
            print_field("Clubs", stats.total_clubs);
            for (contact_type, count) in &stats.contacts_by_type {
                let label = contact_type
                    .parse::<ContactCategory>()
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|_| contact_type.clone());
                print_field(&format!("  {}", label), count);
            }
        }
        Err(e) => warn!("Failed to load contact statistics: {}", e),
    }

    match limits {
        Ok(limits) => {
            for channel in ["email", "linkedin"] {
                if let Some(daily) = usage(&limits, channel, "daily") {
                    print_field(
                        &format!("{} today", channel),
                        format!(
                            "{} / {} ({}%, {} remaining)",
                            daily.count,
                            daily.limit,
                            daily.percent(),
                            daily.remaining()
                        ),
                    );
                }
            }
        }
        Err(e) => warn!("Failed to load rate limits: {}", e),
    }
    Ok(())
}

/// Lists contacts. Clubs live in their own table and are fetched from it
/// when `contact_type` is `club`.
pub async fn contacts(
    ctx: &CommandContext,
    contact_type: Option<String>,
    search: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let contact_type = contact_type.filter(|t| t != "all");
    let contacts: Vec<Contact> = if contact_type.as_deref() == Some("club") {
        ctx.api
            .list_clubs()
            .await
            .map_err(|e| handle_cmd_error!(e, "Failed to list clubs."))?
            .into_iter()
            .map(Contact::from)
            .collect()
    } else {
        ctx.api
            .list_contacts(contact_type)
            .await
            .map_err(|e| handle_cmd_error!(e, "Failed to list contacts."))?
    };

    let shown: Vec<&Contact> = contacts
        .iter()
        .filter(|c| search.as_deref().is_none_or(|term| c.matches(term)))
        .collect();

    println!(
        "{:>6}  {:<26} {:<30} {:<32} {:<16} {}",
        "ID", "NAME", "INSTITUTION", "EMAIL", "TYPE", "STATUS"
    );
    for contact in &shown {
        println!(
            "{:>6}  {:<26} {:<30} {:<32} {:<16} {}",
            contact.id,
            truncate(&contact.display_name(), 26),
            truncate(contact.institution_name.as_deref().unwrap_or("-"), 30),
            truncate(contact.email.as_deref().unwrap_or("-"), 32),
            contact.contact_type.as_deref().unwrap_or("-"),
            contact.status.as_deref().unwrap_or("-")
        );
    }
    println!();
    print_cmd_info!("Contacts", "{} of {} shown", shown.len(), contacts.len());
    Ok(())
}

/// Runs contact discovery for one college, or all of them.
pub async fn discover(
    ctx: &CommandContext,
    college_name: Option<String>,
    limit: u32,
) -> Result<(), Box<dyn Error>> {
    let request = DiscoveryRequest {
        college_name: college_name.filter(|name| !name.trim().is_empty()),
        limit,
    };
    print_cmd_info!(
        "Running discovery",
        "{} (limit {})",
        request.college_name.as_deref().unwrap_or("all colleges"),
        limit
    );
    let results = ctx
        .api
        .discover_contacts(&request)
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to discover contacts."))?;

    print_cmd_success!("Discovery finished.", "");
    print_field("Colleges", number(&results, "colleges_processed"));
    print_field("Transfer centers", number(&results, "transfer_centers_found"));
    print_field("Professors", number(&results, "professors_found"));
    print_field("Clubs", number(&results, "clubs_found"));
    if let Some(errors) = results.get("errors").and_then(Value::as_array) {
        for error in errors {
            print_cmd_warn!("Discovery error", "{}", error.as_str().unwrap_or(&error.to_string()));
        }
    }
    Ok(())
}

pub async fn test_email(ctx: &CommandContext, to: &str) -> Result<(), Box<dyn Error>> {
    let response = ctx
        .api
        .send_test_email(to)
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to send test email."))?;
    report_test_message(&response, "Test email sent successfully!")
}

pub async fn test_linkedin(
    ctx: &CommandContext,
    profile_url: &str,
    message: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let response = ctx
        .api
        .send_test_linkedin(profile_url, message)
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to send test DM."))?;
    report_test_message(&response, "Test DM sent!")
}

/// The test endpoints answer 200 with `success: false` when the channel
/// itself refused.
fn report_test_message(response: &Value, fallback: &str) -> Result<(), Box<dyn Error>> {
    let message = response
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string();
    if response.get("success").and_then(Value::as_bool) == Some(false) {
        print_cmd_error!("Test message failed.", "{}", message);
        return Err(message.into());
    }
    print_cmd_success!("Success!", "{}", message);
    Ok(())
}

pub async fn trigger_linkedin_queue(ctx: &CommandContext) -> Result<(), Box<dyn Error>> {
    ctx.api
        .trigger_linkedin_queue()
        .await
        .map_err(|e| handle_cmd_error!(e, "Failed to trigger the LinkedIn queue."))?;
    print_cmd_success!("LinkedIn queue processing triggered!", "");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOutreachApi;
    use crate::config::Config;
    use crate::models::Club;
    use serde_json::json;
    use std::sync::Arc;

    fn context(mock: MockOutreachApi) -> CommandContext {
        CommandContext {
            api: Arc::new(mock),
            api_url: String::new(),
            config: Config::default(),
        }
    }

    #[test]
    fn test_usage_reads_nested_window() {
        let limits = json!({
            "email": {"daily": {"count": 12, "limit": 50, "remaining": 38}},
            "linkedin": {"daily": {"count": 25, "limit": 20}}
        });
        let email = usage(&limits, "email", "daily").unwrap();
        assert_eq!(email.percent(), 24);
        assert_eq!(email.remaining(), 38);

        let linkedin = usage(&limits, "linkedin", "daily").unwrap();
        assert_eq!(linkedin.percent(), 100);
        assert_eq!(linkedin.remaining(), 0);

        assert!(usage(&limits, "linkedin", "hourly").is_none());
        assert!(usage(&limits, "instagram", "daily").is_none());
    }

    #[test]
    fn test_zero_limit_is_zero_percent() {
        assert_eq!(Usage::default().percent(), 0);
    }

    #[test]
    fn test_number_formats_rates() {
        let kpis = json!({"emails_sent": 140, "email_response_rate": 12.345});
        assert_eq!(number(&kpis, "emails_sent"), "140");
        assert_eq!(number(&kpis, "email_response_rate"), "12.3");
        assert_eq!(number(&kpis, "meetings_scheduled"), "0");
    }

    #[test]
    fn test_refused_test_message_is_an_error() {
        let refused = json!({"success": false, "message": "Session expired"});
        let err = report_test_message(&refused, "sent").unwrap_err();
        assert_eq!(err.to_string(), "Session expired");

        assert!(report_test_message(&json!({"status": "queued"}), "sent").is_ok());
        assert!(report_test_message(&Value::Null, "sent").is_ok());
    }

    #[tokio::test]
    async fn test_club_filter_reads_club_table() {
        let mut mock = MockOutreachApi::new();
        mock.expect_list_clubs().times(1).returning(|| {
            Ok(vec![Club {
                id: 1,
                club_name: Some("Chess Club".to_string()),
                club_type: None,
                institution_name: Some("De Anza".to_string()),
                email: None,
                instagram_handle: None,
                description: None,
                contacted: true,
            }])
        });
        // `list_contacts` has no expectation and would panic if called.
        let ctx = context(mock);
        contacts(&ctx, Some("club".to_string()), Some("chess".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_all_filter_sends_no_type() {
        let mut mock = MockOutreachApi::new();
        mock.expect_list_contacts()
            .withf(|contact_type| contact_type.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));
        let ctx = context(mock);
        contacts(&ctx, Some("all".to_string()), None).await.unwrap();
    }
}
