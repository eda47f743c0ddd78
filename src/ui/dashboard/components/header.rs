//! Dashboard header component
//!
//! Renders the title and the campaign totals

use super::super::state::DashboardState;
use crate::campaigns::CampaignViewModel;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render header with title and totals.
pub fn render_header(f: &mut Frame, area: Rect, state: &DashboardState, vm: &CampaignViewModel) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!("OUTREACH CONSOLE v{}", version))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let totals = if vm.is_loading() {
        Line::from(Span::styled(
            "Loading campaigns...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                format!("{} campaigns", vm.len()),
                Style::default().fg(Color::White),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("{} active", vm.active_count()),
                Style::default().fg(Color::LightGreen),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("{} sent", vm.total_sent()),
                Style::default().fg(Color::LightBlue),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("{} polling", vm.polling_ids().len()),
                Style::default().fg(Color::LightYellow),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("{} ({})", state.environment, state.api_url),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    let totals = Paragraph::new(totals).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(totals, header_chunks[1]);
}
