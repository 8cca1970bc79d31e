//! Player bar rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::model::{PlaybackInfo, VU_METER_BARS};
use super::utils::format_time;

/// Bars at or above this index are drawn dimmer
const VU_METER_PEAK: usize = VU_METER_BARS * 7 / 10;

fn vu_meter(level: usize) -> Line<'static> {
    let spans: Vec<Span> = (0..VU_METER_BARS)
        .map(|i| {
            let style = if i >= level {
                Style::default().fg(Color::DarkGray)
            } else if i < VU_METER_PEAK {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Blue)
            };
            Span::styled("▮", style)
        })
        .collect();
    Line::from(spans)
}

pub fn render_player_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let state = &playback.state;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(VU_METER_BARS as u16 + 4), // VU meter
            Constraint::Min(0),                           // Track + progress
        ])
        .split(area);

    let meter = Paragraph::new(vec![Line::from(""), vu_meter(playback.level)])
        .block(Block::default().borders(Borders::ALL).title(" VU "));
    frame.render_widget(meter, chunks[0]);

    let (icon, track_name) = match playback.track_name.as_deref() {
        Some(name) if state.is_playing => ("▶", name),
        Some(name) => ("⏸", name),
        None => ("■", "NO DISC LOADED"),
    };
    let title = format!(" {} {} ", icon, track_name);

    let status = if state.is_playing { "PLAYING" } else { "STOPPED" };
    let track_position = if playback.track_count == 0 {
        "TRACK: -/-".to_string()
    } else {
        format!("TRACK: {}/{}", state.current_index + 1, playback.track_count)
    };
    let controls_info = format!(
        " VOL {} | {} | {} | CD-DA FORMAT ",
        (state.volume * 100.0).round() as u32,
        status,
        track_position
    );

    let time_str = format!(
        "{} / {}",
        format_time(state.current_time),
        format_time(state.duration)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Line::from(Span::styled(title, Style::default().fg(Color::Cyan))))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(state.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, chunks[1]);
}
