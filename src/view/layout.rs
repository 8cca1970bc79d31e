//! Layout rendering (sidebar with header, navigation and footer)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, UiState};

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header (3 lines + 2 borderlines)
            Constraint::Min(0),    // Navigation
            Constraint::Length(4), // Footer
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "ENHANCED CD",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("WHITE PONY EDITION", Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled("SYSTEM ACTIVE", Style::default().fg(Color::DarkGray)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(header, chunks[0]);

    let nav_items: Vec<ListItem> = ActiveSection::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let is_active = *section == ui_state.active_section;
            let style = if is_active {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if is_active { " ●" } else { "" };
            ListItem::new(format!(
                "{} {} {}{}",
                i + 1,
                section.symbol(),
                section.label().to_uppercase(),
                marker
            ))
            .style(style)
        })
        .collect();

    let nav = List::new(nav_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Navigation ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(nav, chunks[1]);

    let footer = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("SYSTEM ", Style::default().fg(Color::Gray)),
            Span::styled(
                concat!("v", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("RES    ", Style::default().fg(Color::Gray)),
            Span::styled("1024×768", Style::default().fg(Color::White)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(footer, chunks[2]);
}
