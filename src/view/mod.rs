//! View module - UI rendering
//!
//! This module handles all UI rendering for the shell using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, popups, lists)
//! - `layout`: Main layout structure (sidebar)
//! - `content`: Section panels (audio, video, archives, game)
//! - `progress`: Player bar rendering
//! - `overlays`: Modal overlays (help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ActiveSection, GameInfo, PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, game: Option<&GameInfo>) {
        // Fullscreen game takes the whole terminal
        if let Some(game) = game.filter(|g| g.fullscreen && ui_state.active_section == ActiveSection::Game) {
            content::render_game_panel(frame, frame.area(), game);
            if ui_state.show_help_popup {
                overlays::render_help_popup(frame);
            }
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content (sidebar + panel)
                Constraint::Length(4), // Player bar
            ])
            .split(frame.area());

        // Middle: Sidebar and the active panel
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar
                Constraint::Percentage(70), // Panel
            ])
            .split(chunks[0]);

        layout::render_sidebar(frame, main_chunks[0], ui_state);

        match ui_state.active_section {
            ActiveSection::Audio => content::render_audio_panel(frame, main_chunks[1], playback),
            ActiveSection::Video => content::render_video_panel(frame, main_chunks[1], ui_state),
            ActiveSection::Archives => content::render_archives_panel(frame, main_chunks[1], ui_state),
            ActiveSection::Game => match game {
                Some(game) => content::render_game_panel(frame, main_chunks[1], game),
                None => content::render_placeholder(frame, main_chunks[1], "LOADING..."),
            },
        }

        // Bottom: Player bar, visible in every section
        progress::render_player_bar(frame, chunks[1], playback);

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
