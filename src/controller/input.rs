//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::{AppController, VOLUME_STEP};

impl AppController {
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Handle help popup
        if self.ui_state.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                self.ui_state.show_help_popup = false;
            }
            return Ok(());
        }

        // Handle list navigation in the static panels
        match (self.ui_state.active_section, key.code) {
            (ActiveSection::Video | ActiveSection::Archives, KeyCode::Up) => {
                self.move_selection_up();
                return Ok(());
            }
            (ActiveSection::Video | ActiveSection::Archives, KeyCode::Down) => {
                self.move_selection_down();
                return Ok(());
            }
            _ => {}
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                tracing::info!("Quit requested");
                self.ui_state.should_quit = true;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.cycle_section_backward().await;
                } else {
                    self.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                self.cycle_section_backward().await;
            }
            // Jump to a section
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(section) = ActiveSection::from_digit(c) {
                    self.navigate(section).await;
                }
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                self.playback.toggle_play_pause();
            }
            // Next track
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.playback.next_track();
            }
            // Previous track
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.playback.previous_track();
            }
            // Volume up
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.playback.adjust_volume(VOLUME_STEP);
            }
            // Volume down
            KeyCode::Char('-') => {
                self.playback.adjust_volume(-VOLUME_STEP);
            }
            // Game fullscreen
            KeyCode::Char('f') | KeyCode::Char('F') => {
                if let Some(game) = self.game.as_mut() {
                    game.toggle_fullscreen(&self.window).await;
                }
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.ui_state.show_help_popup = true;
            }
            _ => {}
        }
        Ok(())
    }
}
