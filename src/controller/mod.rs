//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! advances the clock-driven parts of the shell and hands snapshots to the view.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback control over the media output
//! - `navigation`: Section switching and list selection

mod input;
mod playback;
mod navigation;

use std::time::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use playback::PlaybackController;

use crate::audio::MediaOutput;
use crate::bridge::GamePanel;
use crate::config::{GameConfig, ShellConfig};
use crate::diagnostics::Diagnostics;
use crate::model::{GameInfo, PlaybackInfo, TrackRegistry, UiState};
use crate::window::TerminalWindow;

/// Volume change per key press
pub const VOLUME_STEP: f32 = 0.05;

/// Owns all shell state. Lives on the UI loop; the playback controller
/// persists across section switches while the game panel only exists while
/// the game section is displayed.
pub struct AppController {
    pub(crate) ui_state: UiState,
    pub(crate) playback: PlaybackController<Box<dyn MediaOutput>>,
    pub(crate) game: Option<GamePanel<StdRng>>,
    game_config: GameConfig,
    window: TerminalWindow,
    diagnostics: Diagnostics,
    rng: StdRng,
}

impl AppController {
    pub fn new(
        config: &ShellConfig,
        output: Box<dyn MediaOutput>,
        window: TerminalWindow,
        diagnostics: Diagnostics,
    ) -> Self {
        let registry = TrackRegistry::new(config.tracks.clone());
        tracing::info!(tracks = registry.len(), "Disc loaded");

        Self {
            ui_state: UiState::default(),
            playback: PlaybackController::new(registry, output, config.initial_volume),
            game: None,
            game_config: config.game.clone(),
            window,
            diagnostics,
            rng: StdRng::from_entropy(),
        }
    }

    /// Advance playback time and the game panel's timers
    pub fn tick(&mut self, now: Instant) {
        self.playback.poll(now);
        if let Some(game) = self.game.as_mut() {
            game.tick(now);
        }
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }

    /// Playback snapshot with a fresh level meter reading
    pub fn playback_info(&mut self) -> PlaybackInfo {
        let jitter = self.rng.gen_range(0.0..1.0);
        self.playback.info(jitter)
    }

    pub fn game_info(&mut self) -> Option<GameInfo> {
        self.game.as_mut().map(GamePanel::info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use crate::audio::SimulatedOutput;
    use crate::model::ActiveSection;

    fn controller(content_root: &Path) -> AppController {
        let mut config = ShellConfig::default();
        config.game.content_root = content_root.to_path_buf();
        AppController::new(
            &config,
            Box::new(SimulatedOutput::new(180)),
            TerminalWindow::new(),
            Diagnostics::new(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn quit_key_sets_should_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());
        assert!(!app.should_quit());
        app.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn key_releases_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        app.handle_key_event(key).await.unwrap();
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn playback_keys_drive_the_controller() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());

        app.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(app.playback.state().is_playing);

        app.handle_key_event(press(KeyCode::Char('n'))).await.unwrap();
        app.handle_key_event(press(KeyCode::Char('N'))).await.unwrap();
        assert_eq!(app.playback.state().current_index, 2);
        assert!(app.playback.state().is_playing);

        app.handle_key_event(press(KeyCode::Char('p'))).await.unwrap();
        assert_eq!(app.playback.state().current_index, 1);

        app.handle_key_event(press(KeyCode::Char('-'))).await.unwrap();
        approx::assert_relative_eq!(app.playback.state().volume, 0.65, epsilon = 1e-6);
        app.handle_key_event(press(KeyCode::Char('+'))).await.unwrap();
        app.handle_key_event(press(KeyCode::Char('+'))).await.unwrap();
        approx::assert_relative_eq!(app.playback.state().volume, 0.75, epsilon = 1e-6);

        app.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(!app.playback.state().is_playing);
    }

    #[tokio::test]
    async fn help_popup_swallows_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());

        app.handle_key_event(press(KeyCode::Char('h'))).await.unwrap();
        assert!(app.ui_state().show_help_popup);

        app.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(!app.playback.state().is_playing);

        app.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!app.ui_state().show_help_popup);
    }

    #[tokio::test]
    async fn playback_survives_section_switches() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());

        app.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        app.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.ui_state().active_section, ActiveSection::Video);
        app.handle_key_event(press(KeyCode::BackTab)).await.unwrap();
        app.handle_key_event(press(KeyCode::BackTab)).await.unwrap();
        assert_eq!(app.ui_state().active_section, ActiveSection::Game);
        assert!(app.game.is_some());
        assert!(app.playback.state().is_playing);
    }

    #[tokio::test]
    async fn info_snapshots_reflect_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(dir.path());
        assert!(app.game_info().is_none());

        let info = app.playback_info();
        assert_eq!(info.track_count, 5);
        assert_eq!(info.level, 0);
        assert_eq!(info.track_name.as_deref(), Some("TRACK 01 :: DIGITAL BATH"));

        app.handle_key_event(press(KeyCode::Char('4'))).await.unwrap();
        let game = app.game_info().unwrap();
        assert!(!game.content_visible);
        assert_eq!(game.locator, "cd-content://localhost/index.html");
    }
}
