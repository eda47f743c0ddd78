//! `outreach calendly`
//!
//! Scheduling link, event types and bookings from the backend's Calendly
//! proxy. The backend holds the Calendly token; the console only reads.

use super::{CommandContext, truncate};
use crate::cli_messages::print_field;
use crate::models::{CalendlyEventType, CalendlyUser, ScheduledEvent};
use crate::{handle_cmd_error, print_cmd_info, print_cmd_warn};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// Upcoming bookings listed at most.
const MAX_UPCOMING: usize = 20;

/// Bookings grouped by calendar day in `tz`, each day in start order. Events
/// whose start time does not parse are left out.
pub fn events_by_day<'a, Tz: TimeZone>(
    events: &'a [ScheduledEvent],
    tz: &Tz,
) -> BTreeMap<NaiveDate, Vec<&'a ScheduledEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<&ScheduledEvent>> = BTreeMap::new();
    for event in events {
        if let Some(start) = event.start() {
            days.entry(start.with_timezone(tz).date_naive())
                .or_default()
                .push(event);
        }
    }
    for day in days.values_mut() {
        day.sort_by_key(|e| e.start());
    }
    days
}

/// Bookings starting after `now`, soonest first.
pub fn upcoming(events: &[ScheduledEvent], now: DateTime<Utc>) -> Vec<&ScheduledEvent> {
    let mut upcoming: Vec<&ScheduledEvent> = events
        .iter()
        .filter(|e| e.start().is_some_and(|start| start.with_timezone(&Utc) > now))
        .collect();
    upcoming.sort_by_key(|e| e.start());
    upcoming
}

pub async fn show(ctx: &CommandContext) -> Result<(), Box<dyn Error>> {
    let (user, event_types, events) = futures::try_join!(
        ctx.api.calendly_user(),
        ctx.api.calendly_event_types(),
        ctx.api.calendly_scheduled_events()
    )
    .map_err(|e| {
        let message = handle_cmd_error!(e, "Failed to load Calendly data.");
        print_cmd_warn!(
            "Check the backend configuration.",
            "CALENDLY_API_TOKEN must be set in its .env file"
        );
        message
    })?;

    print_schedule(&user, &event_types, &events, Utc::now(), &Local);
    Ok(())
}

fn print_schedule<Tz>(
    user: &CalendlyUser,
    event_types: &[CalendlyEventType],
    events: &[ScheduledEvent],
    now: DateTime<Utc>,
    tz: &Tz,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let upcoming = upcoming(events, now);
    let today = now.with_timezone(tz).date_naive();
    let today_count = events_by_day(events, tz).get(&today).map_or(0, Vec::len);

    print_cmd_info!("Calendly", "{}", user.name.as_deref().unwrap_or("connected account"));
    if let Some(url) = user.scheduling_url.as_deref() {
        print_field("Scheduling link", url);
    }
    print_field("Event types", event_types.len());
    print_field("Upcoming", upcoming.len());
    print_field("Today", today_count);

    println!();
    if event_types.is_empty() {
        print_cmd_info!("No event types configured.", "");
    }
    for event_type in event_types {
        println!(
            "  {:<32} {:>8}  {}",
            truncate(&event_type.name, 32),
            event_type
                .duration
                .map_or_else(|| "-".to_string(), |d| format!("{} min", d)),
            event_type.scheduling_url.as_deref().unwrap_or("")
        );
    }

    println!();
    if upcoming.is_empty() {
        print_cmd_info!("No upcoming events.", "");
        return;
    }
    let shown: Vec<ScheduledEvent> = upcoming.into_iter().take(MAX_UPCOMING).cloned().collect();
    for (day, day_events) in events_by_day(&shown, tz) {
        println!("{}", day.format("%a %b %-d, %Y"));
        for event in day_events {
            let time = event
                .start()
                .map(|start| start.with_timezone(tz).format("%-I:%M %p").to_string())
                .unwrap_or_default();
            println!(
                "  {:>8}  {:<32} {:>8}  {}",
                time,
                truncate(&event.name, 32),
                event
                    .duration_minutes()
                    .map_or_else(|| "-".to_string(), |m| format!("{} min", m)),
                event.status.as_deref().unwrap_or("-")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOutreachApi;
    use crate::api::error::ApiError;
    use crate::config::Config;
    use chrono::FixedOffset;
    use std::sync::Arc;

    fn event(name: &str, start: &str) -> ScheduledEvent {
        ScheduledEvent {
            name: name.to_string(),
            start_time: start.to_string(),
            end_time: None,
            status: Some("active".to_string()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_events_bucket_by_local_day() {
        let events = vec![
            event("Late call", "2025-04-02T23:30:00-07:00"),
            event("Morning call", "2025-04-02T16:00:00Z"),
            event("Early call", "2025-04-02T15:00:00Z"),
            event("Garbled", "next tuesday"),
        ];

        let utc = events_by_day(&events, &Utc);
        let names: Vec<&str> = utc[&date(2025, 4, 2)].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Early call", "Morning call"]);
        assert_eq!(utc[&date(2025, 4, 3)].len(), 1);

        let pacific = FixedOffset::west_opt(7 * 3600).unwrap();
        let local = events_by_day(&events, &pacific);
        assert_eq!(local.len(), 1);
        assert_eq!(local[&date(2025, 4, 2)].len(), 3);
    }

    #[test]
    fn test_upcoming_is_sorted_and_excludes_past() {
        let events = vec![
            event("Friday", "2025-04-04T17:00:00Z"),
            event("Monday", "2025-03-31T17:00:00Z"),
            event("Thursday", "2025-04-03T17:00:00Z"),
        ];
        let now = DateTime::parse_from_rfc3339("2025-04-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let names: Vec<&str> = upcoming(&events, now).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Thursday", "Friday"]);
    }

    #[tokio::test]
    async fn test_show_fetches_all_three() {
        let mut mock = MockOutreachApi::new();
        mock.expect_calendly_user().times(1).returning(|| {
            Ok(CalendlyUser {
                name: Some("Outreach Team".to_string()),
                email: None,
                scheduling_url: Some("https://calendly.com/outreach".to_string()),
            })
        });
        mock.expect_calendly_event_types().times(1).returning(|| {
            Ok(vec![CalendlyEventType {
                name: "Intro call".to_string(),
                duration: Some(30),
                scheduling_url: None,
                color: None,
            }])
        });
        mock.expect_calendly_scheduled_events()
            .times(1)
            .returning(|| Ok(vec![event("Intro call", "2099-01-05T17:00:00Z")]));
        let ctx = CommandContext {
            api: Arc::new(mock),
            api_url: String::new(),
            config: Config::default(),
        };

        show(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_show_fails_when_calendly_is_not_configured() {
        let mut mock = MockOutreachApi::new();
        mock.expect_calendly_user().returning(|| {
            Err(ApiError::Http {
                status: 500,
                message: "Calendly API token not configured".to_string(),
            })
        });
        mock.expect_calendly_event_types().returning(|| Ok(vec![]));
        mock.expect_calendly_scheduled_events().returning(|| Ok(vec![]));
        let ctx = CommandContext {
            api: Arc::new(mock),
            api_url: String::new(),
            config: Config::default(),
        };

        let err = show(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("Calendly API token not configured"));
    }
}
