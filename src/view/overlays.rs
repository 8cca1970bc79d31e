//! Overlay rendering (help popup, disc read error)

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::utils::centered_rect;

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("1 - 4", "Jump to section"),
        ("↑ / ↓", "Move selection"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("N", "Next track"),
        ("P", "Previous track"),
        ("+ / -", "Volume up / down"),
        ("", ""),
        ("", "── The Game ──"),
        ("F", "Toggle fullscreen"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    // Create help text lines
    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

/// Static, irreversible error panel shown over the game content
pub fn render_disc_error(frame: &mut Frame, area: Rect, locator: &str) {
    let popup_area = centered_rect(area, 56, 13);
    frame.render_widget(Clear, popup_area);

    let detail = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(Span::styled("⚠", Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            "DISC READ ERROR",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "WebAssembly module failed to load. This may be due to CORS policy restrictions.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled("ERROR: WASM_LOAD_FAILURE", detail)),
        Line::from(Span::styled("STATUS: SECURITY_POLICY_BLOCK", detail)),
        Line::from(Span::styled(format!("LOCATION: {}", locator), detail)),
        Line::from(""),
        Line::from(Span::styled(
            "Check the content runtime logs for troubleshooting.",
            Style::default().fg(Color::White),
        )),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(panel, popup_area);
}
