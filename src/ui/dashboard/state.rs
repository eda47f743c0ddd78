//! Dashboard state management
//!
//! Selection, pending confirmation and the activity log. Campaign data
//! itself lives in the view-model; this only holds what the screen adds.

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event;
use crate::models::Campaign;

use std::collections::VecDeque;
use std::time::Instant;

#[derive(Debug)]
pub struct DashboardState {
    /// The environment the console was started for.
    pub environment: Environment,
    /// Base URL of the backend in use.
    pub api_url: String,
    /// The start time of the dashboard, used for computing uptime.
    pub start_time: Instant,
    /// Row of the campaign table under the cursor.
    pub selected: usize,
    /// Campaign awaiting a y/n delete confirmation.
    pub pending_delete: Option<u64>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<Event>,
    /// Activity logs for display
    pub activity_logs: VecDeque<Event>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    pub fn new(environment: Environment, api_url: String, with_background_color: bool) -> Self {
        Self {
            environment,
            api_url,
            start_time: Instant::now(),
            selected: 0,
            pending_delete: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color,
            tick: 0,
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: Event) {
        self.pending_events.push_back(event);
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Keeps the cursor on a row after the list shrank.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn selected_campaign<'a>(&self, campaigns: &'a [Campaign]) -> Option<&'a Campaign> {
        campaigns.get(self.selected)
    }
}
