//! Message templates and progress snapshots

use super::campaign::{Channel, ContactCategory};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// `email` when absent.
    #[serde(default)]
    pub template_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    /// Explicit audience link. Older backends leave it out, in which case
    /// the audience is inferred from the name.
    #[serde(default)]
    pub target_contact_type: Option<String>,
}

impl Template {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn channel(&self) -> Channel {
        Channel::from_loose(self.template_type.as_deref())
    }

    pub fn category(&self) -> Option<ContactCategory> {
        self.target_contact_type
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse().ok())
    }

    /// `true` when the backend tagged the template with an audience at all,
    /// even one this console cannot parse.
    pub fn has_explicit_category(&self) -> bool {
        self.target_contact_type
            .as_deref()
            .is_some_and(|raw| !raw.is_empty())
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(subject) = self.subject.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " - {}", subject)?;
        }
        Ok(())
    }
}

/// Delivery counters for one campaign.
///
/// `pending` is required: a body without it fails to decode instead of
/// reading as finished.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub sent: u64,
    pub pending: u64,
    #[serde(default)]
    pub failed: u64,
}

impl Progress {
    /// Nothing left to send; polling stops on this.
    pub fn is_finished(&self) -> bool {
        self.pending == 0
    }

    pub fn sent_percent(&self) -> u16 {
        percent_of(self.sent, self.total)
    }

    pub fn failed_percent(&self) -> u16 {
        percent_of(self.failed, self.total)
    }

    /// Share of the bar that is filled (sent plus failed), capped at 100.
    pub fn processed_percent(&self) -> u16 {
        self.sent_percent()
            .saturating_add(self.failed_percent())
            .min(100)
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sent, {} pending", self.sent, self.pending)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        write!(f, " ({}% complete)", self.sent_percent())
    }
}

/// Rounded integer percentage, capped at 100. A zero total counts as one so
/// the math never divides by zero; the counts themselves are left untouched.
fn percent_of(part: u64, total: u64) -> u16 {
    let total = total.max(1);
    ((part as f64 / total as f64) * 100.0).round().min(100.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(total: u64, sent: u64, pending: u64, failed: u64) -> Progress {
        Progress {
            total,
            sent,
            pending,
            failed,
        }
    }

    #[test]
    fn test_zero_total_renders_zero_percent() {
        let empty = progress(0, 0, 0, 0);
        assert_eq!(empty.sent_percent(), 0);
        assert_eq!(empty.processed_percent(), 0);
        assert!(empty.to_string().contains("0% complete"));
    }

    #[test]
    fn test_percentages_round_half_up() {
        let p = progress(8, 1, 6, 1);
        // 12.5% each way
        assert_eq!(p.sent_percent(), 13);
        assert_eq!(p.failed_percent(), 13);
        assert_eq!(p.processed_percent(), 26);
    }

    #[test]
    fn test_display_mentions_failures_only_when_present() {
        assert_eq!(
            progress(10, 3, 7, 0).to_string(),
            "3 sent, 7 pending (30% complete)"
        );
        assert_eq!(
            progress(10, 8, 0, 2).to_string(),
            "8 sent, 0 pending, 2 failed (80% complete)"
        );
    }

    #[test]
    fn test_template_type_defaults_to_email() {
        let template: Template =
            serde_json::from_str(r#"{"id": 1, "name": "club_initial", "template_type": null}"#)
                .unwrap();
        assert_eq!(template.channel(), Channel::Email);
        assert!(!template.has_explicit_category());

        let dm: Template =
            serde_json::from_str(r#"{"id": 2, "name": "dm", "template_type": "LinkedIn"}"#).unwrap();
        assert_eq!(dm.channel(), Channel::Linkedin);
    }

    #[test]
    fn test_progress_without_pending_is_rejected() {
        assert!(serde_json::from_str::<Progress>(r#"{"total": 4, "sent": 4}"#).is_err());
        assert!(
            serde_json::from_str::<Progress>(r#"{"total": 4, "sent": 4, "pending": null}"#)
                .is_err()
        );

        let p: Progress = serde_json::from_str(r#"{"pending": 0}"#).unwrap();
        assert!(p.is_finished());
        assert_eq!(p, Progress::default());
    }

    #[test]
    fn test_inconsistent_counts_stay_in_range() {
        let p = progress(0, 700, 0, 700);
        assert_eq!(p.sent_percent(), 100);
        assert_eq!(p.failed_percent(), 100);
        assert_eq!(p.processed_percent(), 100);
        assert!(p.to_string().contains("(100% complete)"));

        let p = progress(3, 1_000_000, 0, 1_000_000);
        assert_eq!(p.processed_percent(), 100);
    }
}
