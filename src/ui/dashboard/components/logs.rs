//! Dashboard logs panel component
//!
//! Renders activity logs with event formatting

use super::super::state::DashboardState;
use super::super::utils::{clean_http_error_message, format_compact_timestamp};
use crate::events::EventType;
use crate::logging::LogLevel;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

fn event_color(event_type: EventType, log_level: LogLevel) -> Color {
    match (event_type, log_level) {
        (EventType::Completed, _) => Color::LightGreen,
        (_, LogLevel::Error) => Color::LightRed,
        (_, LogLevel::Warn) => Color::Yellow,
        (EventType::Progress, _) => Color::DarkGray,
        _ => Color::White,
    }
}

/// Render the logs panel, newest first.
pub fn render_logs_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    // Account for borders and padding
    let log_count = (area.height.saturating_sub(3) as usize).max(1);

    let log_lines: Vec<Line> = state
        .activity_logs
        .iter()
        .filter(|event| event.should_display())
        .rev()
        .take(log_count)
        .map(|event| {
            let status_icon = match (event.event_type, event.log_level) {
                (EventType::Completed, _) => "✅",
                (EventType::Error, LogLevel::Error) | (EventType::Action, LogLevel::Error) => "❌",
                (EventType::Error, _) => "⚠",
                (EventType::Progress, _) => "·",
                (EventType::Action, _) => "▶",
            };
            let compact_time = format_compact_timestamp(&event.timestamp);
            let cleaned_msg = clean_http_error_message(&event.msg);

            Line::from(vec![
                Span::raw(format!("{} ", status_icon)),
                Span::styled(
                    format!("{} ", compact_time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    cleaned_msg,
                    Style::default().fg(event_color(event.event_type, event.log_level)),
                ),
            ])
        })
        .collect();

    let log_paragraph = if log_lines.is_empty() {
        Paragraph::new(vec![Line::from("Waiting for activity...")])
    } else {
        Paragraph::new(log_lines)
    };

    let logs_block = Block::default()
        .title("ACTIVITY LOG")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    f.render_widget(
        log_paragraph.block(logs_block).wrap(Wrap { trim: true }),
        area,
    );
}
