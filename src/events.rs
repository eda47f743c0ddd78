//! Event System
//!
//! Events emitted by campaign pollers and by user actions, consumed by the
//! view-model (reload on completion) and shown in the activity log.

use crate::logging::{LogLevel, should_log_with_env};
use crate::models::Progress;
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    /// A fresh progress snapshot arrived.
    Progress,
    /// A campaign has nothing left pending; its poller is gone.
    Completed,
    /// A background request failed and will be retried on the next tick.
    Error,
    /// Outcome of something the user asked for.
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Campaign the event is about, if any.
    pub campaign_id: Option<u64>,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    pub progress: Option<Progress>,
}

impl Event {
    fn new(
        campaign_id: Option<u64>,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self {
            campaign_id,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            progress: None,
        }
    }

    pub fn progress(campaign_id: u64, progress: Progress) -> Self {
        let mut event = Self::new(
            Some(campaign_id),
            format!("Campaign {}: {}", campaign_id, progress),
            EventType::Progress,
            LogLevel::Debug,
        );
        event.progress = Some(progress);
        event
    }

    pub fn completed(campaign_id: u64, progress: Progress) -> Self {
        let mut event = Self::new(
            Some(campaign_id),
            format!(
                "Campaign {} finished sending ({} sent, {} failed)",
                campaign_id, progress.sent, progress.failed
            ),
            EventType::Completed,
            LogLevel::Info,
        );
        event.progress = Some(progress);
        event
    }

    pub fn poll_failed(campaign_id: u64, msg: String, log_level: LogLevel) -> Self {
        Self::new(
            Some(campaign_id),
            format!("Progress check for campaign {} failed: {}", campaign_id, msg),
            EventType::Error,
            log_level,
        )
    }

    pub fn action(campaign_id: Option<u64>, msg: String, log_level: LogLevel) -> Self {
        Self::new(campaign_id, msg, EventType::Action, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show completions and info level events
        if self.event_type == EventType::Completed || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}
