//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::campaigns::CampaignViewModel;
use crate::logging::LogLevel;
use crate::models::CampaignStatus;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{Terminal, backend::Backend};
use std::time::Duration;

/// Application state
pub struct App {
    /// Campaign data and pollers.
    view_model: CampaignViewModel,
    /// What the screen adds on top: selection, log, confirmations.
    state: DashboardState,
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    Reload,
    Start(u64),
    Delete(u64),
    ImportTemplates,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(view_model: CampaignViewModel, state: DashboardState) -> Self {
        Self { view_model, state }
    }

    /// Updates selection and confirmation state for a key and returns the
    /// request, if any, that needs the backend.
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let campaigns = self.view_model.campaigns();
        let len = campaigns.len();

        if let Some(id) = self.state.pending_delete {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.state.pending_delete = None;
                    Action::Delete(id)
                }
                _ => {
                    self.state.pending_delete = None;
                    Action::None
                }
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select_next(len);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.select_previous(len);
                Action::None
            }
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('i') => Action::ImportTemplates,
            KeyCode::Char('s') => match self.state.selected_campaign(campaigns) {
                Some(c) if c.status == CampaignStatus::Draft => Action::Start(c.id),
                Some(c) => {
                    let msg = format!("Campaign {} is {}, only drafts can be started", c.id, c.status);
                    self.state.record_action(Some(c.id), msg, LogLevel::Warn);
                    Action::None
                }
                None => Action::None,
            },
            KeyCode::Char('d') => {
                if let Some(c) = self.state.selected_campaign(campaigns) {
                    self.state.pending_delete = Some(c.id);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Runs a backend request and logs its outcome.
    async fn perform(&mut self, action: Action) {
        match action {
            Action::None | Action::Quit => {}
            Action::Reload => {
                self.view_model.load_campaigns().await;
                self.view_model.load_templates().await;
                self.state.record_action(
                    None,
                    format!("Reloaded {} campaigns", self.view_model.len()),
                    LogLevel::Info,
                );
            }
            Action::Start(id) => match self.view_model.start_campaign(id).await {
                Ok(()) => self.state.record_action(
                    Some(id),
                    format!("Started campaign {}", id),
                    LogLevel::Info,
                ),
                Err(e) => self.state.record_action(
                    Some(id),
                    format!("Failed to start campaign {}: {}", id, e),
                    LogLevel::Error,
                ),
            },
            Action::Delete(id) => match self.view_model.delete_campaign(id).await {
                Ok(()) => self.state.record_action(
                    Some(id),
                    format!("Deleted campaign {}", id),
                    LogLevel::Info,
                ),
                Err(e) => self.state.record_action(
                    Some(id),
                    format!("Failed to delete campaign {}: {}", id, e),
                    LogLevel::Error,
                ),
            },
            Action::ImportTemplates => match self.view_model.import_templates().await {
                Ok(_) => self.state.record_action(
                    None,
                    format!(
                        "Templates imported, {} available",
                        self.view_model.templates().len()
                    ),
                    LogLevel::Info,
                ),
                Err(e) => self.state.record_action(
                    None,
                    format!("Failed to import templates: {}", e),
                    LogLevel::Error,
                ),
            },
        }
    }
}

/// Runs the dashboard in a loop, handling events and rendering the screen.
/// Every poller is cancelled before this returns.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    app.view_model.load_campaigns().await;
    app.view_model.load_templates().await;

    let result = event_loop(terminal, &mut app).await;
    app.view_model.dispose();
    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    loop {
        // Queue poller events; a completion reloads the list here.
        for event in app.view_model.process_events().await {
            app.state.add_event(event);
        }

        app.state.update(app.view_model.len());
        terminal.draw(|f| render_dashboard(f, &app.state, &app.view_model))?;

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                let action = app.handle_key(key);
                if action == Action::Quit {
                    return Ok(());
                }
                app.perform(action).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOutreachApi;
    use crate::environment::Environment;
    use crate::models::Campaign;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn campaign(id: u64, status: CampaignStatus) -> Campaign {
        Campaign {
            id,
            name: format!("Campaign {}", id),
            campaign_type: None,
            target_contact_type: None,
            status,
            attachment_path: None,
            sent_count: None,
            created_at: None,
        }
    }

    async fn app_with(campaigns: Vec<Campaign>) -> App {
        let mut mock = MockOutreachApi::new();
        mock.expect_list_campaigns()
            .returning(move |_| Ok(campaigns.clone()));
        let mut vm = CampaignViewModel::new(Arc::new(mock), Duration::from_secs(5), "");
        vm.load_campaigns().await;
        App::new(vm, DashboardState::new(Environment::Local, String::new(), false))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_start_only_offered_for_drafts() {
        let mut app = app_with(vec![
            campaign(1, CampaignStatus::Draft),
            campaign(2, CampaignStatus::Completed),
        ])
        .await;

        assert_eq!(app.handle_key(press(KeyCode::Char('s'))), Action::Start(1));

        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.handle_key(press(KeyCode::Char('s'))), Action::None);
        assert_eq!(app.state.pending_events.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let mut app = app_with(vec![campaign(7, CampaignStatus::Draft)]).await;

        assert_eq!(app.handle_key(press(KeyCode::Char('d'))), Action::None);
        assert_eq!(app.state.pending_delete, Some(7));
        // Any other key cancels, including quit.
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.state.pending_delete, None);

        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.handle_key(press(KeyCode::Char('y'))), Action::Delete(7));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(vec![]).await;
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.handle_key(press(KeyCode::Char('d'))), Action::None);
        assert_eq!(app.state.pending_delete, None);
    }
}
