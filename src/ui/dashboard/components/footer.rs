//! Dashboard footer component
//!
//! Renders key bindings, or the delete confirmation prompt

use super::super::state::DashboardState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let (footer_text, footer_color) = match state.pending_delete {
        Some(id) => (
            format!("Delete campaign {}? [Y] Yes | [N] No", id),
            Color::LightRed,
        ),
        None => (
            "[↑/↓] Select | [S] Start | [D] Delete | [R] Reload | [I] Import templates | [Q] Quit"
                .to_string(),
            Color::Cyan,
        ),
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(footer_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
