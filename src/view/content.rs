//! Section panel rendering (audio, video gallery, archives, game)

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ARCHIVES, AUDIO_FORMATS, AUDIO_SPECIFICATIONS, ActiveSection, GameInfo, PlaybackInfo, Phase,
    QUICK_START, SYSTEM_CHECKS, UiState, VIDEO_FORMAT, VIDEOS,
};
use super::overlays;
use super::utils::{cell_bar, centered_rect, format_bytes, render_scrollable_list};

/// Cells in the disc access strip
const DISC_GRID_CELLS: usize = 16;

fn accent() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Two-line panel heading: symbol and title, then a subtitle
fn heading(section: ActiveSection, title: &str, subtitle: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!("{} ", section.symbol()), accent()),
            Span::styled(title.to_string(), accent()),
        ]),
        Line::from(Span::styled(subtitle.to_string(), Style::default().fg(Color::Gray))),
    ]
}

fn bullet_list(title: &str, items: &[&str]) -> Paragraph<'static> {
    let lines: Vec<Line> = items
        .iter()
        .map(|item| Line::from(Span::styled(format!("• {}", item), dim())))
        .collect();
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", title), accent()))
            .padding(Padding::horizontal(1)),
    )
}

pub fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(content, area);
}

pub fn render_audio_panel(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Heading
            Constraint::Length(6), // Specifications + formats
            Constraint::Length(6), // Quick start
            Constraint::Min(0),    // Status
        ])
        .split(inner);

    let title = Paragraph::new(heading(
        ActiveSection::Audio,
        "AUDIO PLAYER",
        "DIGITAL CD TRANSPORT SYSTEM",
    ))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    frame.render_widget(bullet_list("SPECIFICATIONS", &AUDIO_SPECIFICATIONS), info_chunks[0]);
    frame.render_widget(bullet_list("SUPPORTED FORMATS", &AUDIO_FORMATS), info_chunks[1]);

    let quick_start: Vec<Line> = QUICK_START
        .iter()
        .map(|step| Line::from(Span::styled(step.to_string(), dim())))
        .collect();
    let quick_start = Paragraph::new(quick_start).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" QUICK START ", accent()))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(quick_start, chunks[2]);

    let status = if playback.track_count == 0 {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Red)),
            Span::styled("NO DISC LOADED", Style::default().fg(Color::Gray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("AUDIO SUBSYSTEM READY :: {} TRACKS", playback.track_count),
                Style::default().fg(Color::Gray),
            ),
        ])
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), status]).alignment(Alignment::Center),
        chunks[3],
    );
}

pub fn render_video_panel(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Heading
            Constraint::Min(0),    // Video list
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let title = Paragraph::new(heading(
        ActiveSection::Video,
        "VIDEO GALLERY",
        "MULTIMEDIA ARCHIVE :: MPEG COLLECTION",
    ))
    .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = VIDEOS
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let is_selected = i == ui_state.video_selected;
            let title_style = if is_selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(if is_selected { "▶ " } else { "  " }, title_style),
                    Span::styled(format!("{:02} ", video.id), dim()),
                    Span::styled(video.title, title_style),
                ]),
                Line::from(Span::styled(format!("      {}", VIDEO_FORMAT), dim())),
            ])
        })
        .collect();

    render_scrollable_list(
        frame,
        chunks[1],
        items,
        ui_state.video_selected,
        Block::default()
            .borders(Borders::ALL)
            .title(" Videos ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );

    let footer = Paragraph::new("VIDEO PLAYBACK REQUIRES CODEC INSTALLATION")
        .style(dim())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

pub fn render_archives_panel(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Heading
            Constraint::Min(0),    // File listing
            Constraint::Length(6), // Instructions
        ])
        .split(area);

    let title = Paragraph::new(heading(
        ActiveSection::Archives,
        "ARCHIVES",
        "FILE SYSTEM :: DISC CONTENTS",
    ))
    .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(title, chunks[0]);

    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        format!("  {:<20} {:>8}  {:<12} {}", "NAME", "SIZE", "DATE", "STATUS"),
        header_style,
    )))];
    items.extend(ARCHIVES.iter().enumerate().map(|(i, entry)| {
        let is_selected = i == ui_state.archive_selected;
        let style = if is_selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let icon = if entry.is_folder() { "▣" } else { "□" };
        ListItem::new(Line::from(vec![
            Span::styled(format!("{} {:<20}", icon, entry.name), style),
            Span::styled(format!(" {:>8}  {:<12} ", entry.size, entry.date), dim()),
            Span::styled("● READY", Style::default().fg(Color::Green)),
        ]))
    }));

    // Offset by one for the header row
    render_scrollable_list(
        frame,
        chunks[1],
        items,
        ui_state.archive_selected + 1,
        Block::default()
            .borders(Borders::ALL)
            .title(" Files ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );

    let instructions = Paragraph::new(vec![
        Line::from(Span::styled("• SELECT FILE TO VIEW CONTENTS", dim())),
        Line::from(Span::styled("• FOLDERS CONTAIN ADDITIONAL MEDIA", dim())),
        Line::from(Span::styled("• READ README.TXT FOR DISC INFORMATION", dim())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" INSTRUCTIONS: ", accent()))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(instructions, chunks[2]);
}

pub fn render_game_panel(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with fullscreen control
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer status
        ])
        .split(area);

    render_game_header(frame, chunks[0], game);

    // The runtime view replaces the loading screens only once the frame is shown
    match game.phase {
        _ if game.content_visible => render_runtime(frame, chunks[1], game),
        Phase::DiscRead | Phase::Ready => render_disc_read(frame, chunks[1], game),
        Phase::Idle | Phase::EngineCheck | Phase::Cancelled => {
            render_system_check(frame, chunks[1], game)
        }
    }
    if game.error {
        overlays::render_disc_error(frame, chunks[1], "game/game.wasm");
    }

    render_game_footer(frame, chunks[2], game);
}

fn render_game_header(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(area);

    let title = Paragraph::new(heading(ActiveSection::Game, "THE GAME", "GODOT RUNTIME ENVIRONMENT"))
        .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(title, chunks[0]);

    let label = if game.fullscreen { "◱ EXIT FULLSCREEN" } else { "◰ FULLSCREEN" };
    let style = if game.controls_enabled || game.fullscreen {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        dim()
    };
    let button = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(format!("[F] {}", label), style))])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, chunks[1]);
}

fn render_system_check(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let panel = centered_rect(area, 60, 12);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Current check
            Constraint::Min(0),    // Check grid
        ])
        .split(panel);

    let title = Paragraph::new(vec![
        Line::from(Span::styled("SYSTEM CHECK", accent())),
        Line::from(Span::styled("INITIALIZING GAME ENGINE...", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(f64::from(game.engine_percent.min(100)) / 100.0)
        .label(format!("{}%", game.engine_percent));
    frame.render_widget(gauge, chunks[1]);

    frame.render_widget(
        Paragraph::new(Span::styled(game.check_label, Style::default().fg(Color::White)))
            .alignment(Alignment::Center),
        chunks[2],
    );

    // Every check but the final "ready" line, three per row
    let checks = &SYSTEM_CHECKS[..SYSTEM_CHECKS.len() - 1];
    let lines: Vec<Line> = checks
        .chunks(3)
        .enumerate()
        .map(|(row, chunk)| {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, check)| {
                    let idx = row * 3 + col;
                    let done = idx <= game.status_index;
                    let word = check.split(' ').next().unwrap_or_default();
                    let text = format!(" {} {:<12}", if done { "✓" } else { "○" }, word);
                    if done {
                        Span::styled(text, Style::default().fg(Color::Cyan))
                    } else {
                        Span::styled(text, dim())
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[3]);
}

fn render_disc_read(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let panel = centered_rect(area, 60, 12);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Gauge
            Constraint::Length(1), // Bytes
            Constraint::Length(2), // Access grid
            Constraint::Min(0),    // Speed
        ])
        .split(panel);

    let title = Paragraph::new(vec![
        Line::from(Span::styled("◈ READING DISC", accent())),
        Line::from(Span::styled(
            "LOADING GAME DATA FROM CD-ROM...",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let percent = game.disc_percent.clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(percent / 100.0)
        .label(format!("{}%", percent.round() as u32));
    frame.render_widget(gauge, chunks[1]);

    let bytes_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(10)])
        .split(chunks[2]);
    frame.render_widget(
        Paragraph::new(format!(
            "{} / {}",
            format_bytes(game.bytes_read),
            format_bytes(game.total_bytes)
        ))
        .style(Style::default().fg(Color::White)),
        bytes_chunks[0],
    );
    frame.render_widget(
        Paragraph::new("READING...")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Right),
        bytes_chunks[1],
    );

    let lit = ((percent / 100.0) * DISC_GRID_CELLS as f64).floor() as usize;
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(cell_bar(lit, lit, '█', '░'), Style::default().fg(Color::Cyan)),
            Span::styled(
                cell_bar(0, DISC_GRID_CELLS.saturating_sub(lit), '█', '░'),
                dim(),
            ),
        ]))
        .alignment(Alignment::Center),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new("DISC SPEED: 52X CAV")
            .style(dim())
            .alignment(Alignment::Center),
        chunks[4],
    );
}

fn render_runtime(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let entry = if game.entry_loaded {
        Span::styled("LOADED", Style::default().fg(Color::Green))
    } else {
        Span::styled("NOT FOUND", Style::default().fg(Color::Red))
    };
    let runtime = if game.runtime_running {
        Span::styled("RUNNING", Style::default().fg(Color::Green))
    } else {
        Span::styled("IDLE", dim())
    };

    let lines = vec![
        Line::from(vec![Span::styled("SOURCE   ", dim()), Span::raw(game.locator.clone())]),
        Line::from(vec![Span::styled("ENTRY    ", dim()), entry]),
        Line::from(vec![Span::styled("RUNTIME  ", dim()), runtime]),
        Line::from(vec![Span::styled("SANDBOX  ", dim()), Span::raw(game.sandbox.clone())]),
    ];

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Runtime ")
                .padding(Padding::horizontal(1))
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(content, area);
}

fn render_game_footer(frame: &mut Frame, area: Rect, game: &GameInfo) {
    let indicator = if game.status.is_active() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("● ", indicator),
        Span::styled(game.status.label(), Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title_bottom(Line::from(" FRAME BUFFER: 1024×768 ").right_aligned()),
    );
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::model::GameStatus;

    fn ready_game(content_visible: bool) -> GameInfo {
        GameInfo {
            phase: Phase::Ready,
            status: GameStatus::RuntimeActive,
            engine_percent: 100,
            status_index: SYSTEM_CHECKS.len() - 1,
            check_label: SYSTEM_CHECKS[SYSTEM_CHECKS.len() - 1],
            disc_percent: 100.0,
            bytes_read: 1024,
            total_bytes: 1024,
            content_visible,
            error: false,
            fullscreen: false,
            controls_enabled: true,
            locator: "cd-content://localhost/index.html".to_string(),
            sandbox: "allow-scripts".to_string(),
            entry_loaded: true,
            runtime_running: false,
        }
    }

    fn draw(game: &GameInfo) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| render_game_panel(f, f.area(), game))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn runtime_view_waits_for_the_frame_to_be_shown() {
        let hidden = draw(&ready_game(false));
        assert!(hidden.contains("READING DISC"));
        assert!(!hidden.contains("cd-content://localhost/index.html"));

        let shown = draw(&ready_game(true));
        assert!(shown.contains("cd-content://localhost/index.html"));
        assert!(!shown.contains("LOADING GAME DATA"));
    }
}
