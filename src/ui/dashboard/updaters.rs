//! Dashboard state update logic
//!
//! Moves queued events into the activity log once per frame.

use super::state::DashboardState;

use crate::events::Event;
use crate::logging::LogLevel;

impl DashboardState {
    /// Update the dashboard state with a new tick and the queued events.
    pub fn update(&mut self, campaign_count: usize) {
        self.tick += 1;

        // Progress events are kept too; the log panel hides them below debug.
        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }

        // A reload may have removed the selected row or the one awaiting deletion.
        self.clamp_selection(campaign_count);
        if campaign_count == 0 {
            self.pending_delete = None;
        }
    }

    /// Records the outcome of a key-triggered action.
    pub fn record_action(&mut self, campaign_id: Option<u64>, msg: String, log_level: LogLevel) {
        self.add_event(Event::action(campaign_id, msg, log_level));
    }
}
