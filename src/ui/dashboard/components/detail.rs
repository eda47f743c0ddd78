//! Dashboard detail panel component
//!
//! Renders the selected campaign with its progress gauge

use super::super::state::DashboardState;
use super::super::utils::{format_created_at, get_status_color};
use crate::campaigns::CampaignViewModel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap};

fn field<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<11}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

pub fn render_detail_panel(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    vm: &CampaignViewModel,
) {
    let block = Block::default()
        .title("SELECTED")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(campaign) = state.selected_campaign(vm.campaigns()) else {
        f.render_widget(
            Paragraph::new("No campaign selected").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(2)])
        .split(inner);

    let lines = vec![
        Line::from(Span::styled(
            campaign.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        field(
            "Status",
            campaign.status.to_string(),
            get_status_color(campaign.status),
        ),
        field("Channel", campaign.channel().label().to_string(), Color::LightBlue),
        field("Audience", campaign.audience_label(), Color::White),
        field(
            "Attachment",
            if campaign.has_attachment() { "PDF deck" } else { "none" }.to_string(),
            Color::White,
        ),
        field("Created", format_created_at(campaign.created_at.as_deref()), Color::White),
        field("Sent", campaign.sent().to_string(), Color::White),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    let (label, percent, color) = match vm.progress(campaign.id) {
        Some(p) => (p.to_string(), p.processed_percent(), Color::LightGreen),
        None if campaign.is_active() => ("waiting for progress...".to_string(), 0, Color::DarkGray),
        None => ("not sending".to_string(), 0, Color::DarkGray),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(percent)
        .label(label);
    f.render_widget(gauge, chunks[1]);
}
