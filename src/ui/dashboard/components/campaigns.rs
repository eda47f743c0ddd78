//! Dashboard campaign table component
//!
//! One row per campaign with a live progress bar for polled campaigns

use super::super::state::DashboardState;
use super::super::utils::{get_channel_color, get_status_color, progress_bar};
use crate::campaigns::CampaignViewModel;
use crate::commands::truncate;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

const BAR_WIDTH: usize = 12;

pub fn render_campaigns_table(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    vm: &CampaignViewModel,
) {
    let header = Row::new(["ID", "NAME", "CHANNEL", "AUDIENCE", "STATUS", "SENT", "PROGRESS"])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = vm
        .campaigns()
        .iter()
        .map(|campaign| {
            let progress = match vm.progress(campaign.id) {
                Some(p) => format!(
                    "{} {:>3}%",
                    progress_bar(p.processed_percent(), BAR_WIDTH),
                    p.sent_percent()
                ),
                None => String::new(),
            };
            let mut status = campaign.status.to_string();
            if vm.is_polling(campaign.id) {
                status.push_str(" ⟳");
            }
            Row::new([
                Cell::from(campaign.id.to_string()),
                Cell::from(truncate(&campaign.name, 30)),
                Cell::from(campaign.channel().label())
                    .style(Style::default().fg(get_channel_color(campaign.channel()))),
                Cell::from(truncate(&campaign.audience_label(), 22)),
                Cell::from(status).style(Style::default().fg(get_status_color(campaign.status))),
                Cell::from(campaign.sent().to_string()),
                Cell::from(progress).style(Style::default().fg(Color::LightGreen)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(BAR_WIDTH as u16 + 5),
    ];

    let title = if vm.is_empty() && !vm.is_loading() {
        "CAMPAIGNS (none yet, create one with `outreach campaigns create`)"
    } else {
        "CAMPAIGNS"
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 48, 56))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    if !vm.is_empty() {
        table_state.select(Some(state.selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}
