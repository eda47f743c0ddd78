//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::models::{CampaignStatus, Channel};
use chrono::{DateTime, NaiveDateTime};
use ratatui::prelude::Color;

/// Get a ratatui color for a campaign status
pub fn get_status_color(status: CampaignStatus) -> Color {
    match status {
        CampaignStatus::Draft => Color::Gray,
        CampaignStatus::Active => Color::LightGreen,
        CampaignStatus::Paused => Color::Yellow,
        CampaignStatus::Completed => Color::Cyan,
        CampaignStatus::Unknown => Color::DarkGray,
    }
}

pub fn get_channel_color(channel: Channel) -> Color {
    match channel {
        Channel::Email => Color::LightBlue,
        Channel::Linkedin => Color::Blue,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// `created_at` as sent by the backend, either RFC 3339 or a naive ISO
/// timestamp, shortened to `YYYY-MM-DD`.
pub fn format_created_at(created_at: Option<&str>) -> String {
    let Some(raw) = created_at.filter(|raw| !raw.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Fixed-width text bar for table cells, e.g. `█████░░░░░`.
pub fn progress_bar(percent: u16, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width).div_ceil(100).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    // Replace verbose transport errors with cleaner messages
    if msg.contains("operation timed out") || msg.contains("timed out") {
        return "Request timed out - retrying...".to_string();
    }
    if msg.contains("error sending request") {
        return "Backend unreachable - retrying...".to_string();
    }
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2025-03-07 14:05:59"), "03-07 14:05");
        assert_eq!(format_compact_timestamp("garbled"), "garbled");
    }

    #[test]
    fn test_created_at_formats() {
        assert_eq!(format_created_at(Some("2025-01-31T09:30:00Z")), "2025-01-31");
        assert_eq!(format_created_at(Some("2025-01-31T09:30:00.123456")), "2025-01-31");
        assert_eq!(format_created_at(Some("yesterday")), "yesterday");
        assert_eq!(format_created_at(None), "-");
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(100, 4), "████");
        assert_eq!(progress_bar(30, 10), "███░░░░░░░");
        assert_eq!(progress_bar(1, 10), "█░░░░░░░░░");
        assert_eq!(progress_bar(250, 3), "███");
    }

    #[test]
    fn test_transport_errors_are_shortened() {
        let msg = "Progress check for campaign 3 failed: error sending request for url (http://localhost:8000/api/campaigns/3/progress)";
        assert_eq!(clean_http_error_message(msg), "Backend unreachable - retrying...");
        assert_eq!(clean_http_error_message("Campaign not found"), "Campaign not found");
    }
}
