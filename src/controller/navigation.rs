//! Section switching and list selection

use std::time::Instant;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bridge::GamePanel;
use crate::model::{ARCHIVES, ActiveSection, VIDEOS, select_next, select_prev};
use crate::window::HostWindow;
use super::AppController;

impl AppController {
    /// Display another section. The game panel is mounted on entry and torn
    /// down on exit; playback is untouched.
    pub async fn navigate(&mut self, section: ActiveSection) {
        let previous = self.ui_state.active_section;
        if previous == section {
            return;
        }
        tracing::debug!(from = ?previous, to = ?section, "Navigating");

        if previous == ActiveSection::Game {
            self.unmount_game().await;
        }
        self.ui_state.active_section = section;
        if section == ActiveSection::Game {
            self.mount_game().await;
        }
    }

    pub async fn cycle_section_forward(&mut self) {
        self.navigate(self.ui_state.active_section.next()).await;
    }

    pub async fn cycle_section_backward(&mut self) {
        self.navigate(self.ui_state.active_section.prev()).await;
    }

    pub fn move_selection_up(&mut self) {
        match self.ui_state.active_section {
            ActiveSection::Video => {
                self.ui_state.video_selected = select_prev(self.ui_state.video_selected);
            }
            ActiveSection::Archives => {
                self.ui_state.archive_selected = select_prev(self.ui_state.archive_selected);
            }
            _ => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.ui_state.active_section {
            ActiveSection::Video => {
                self.ui_state.video_selected =
                    select_next(self.ui_state.video_selected, VIDEOS.len());
            }
            ActiveSection::Archives => {
                self.ui_state.archive_selected =
                    select_next(self.ui_state.archive_selected, ARCHIVES.len());
            }
            _ => {}
        }
    }

    async fn mount_game(&mut self) {
        let panel = GamePanel::mount(
            &self.game_config,
            self.diagnostics.clone(),
            StdRng::from_entropy(),
            Instant::now(),
        )
        .await;
        self.game = Some(panel);
    }

    async fn unmount_game(&mut self) {
        let Some(panel) = self.game.take() else {
            return;
        };
        let was_fullscreen = panel.is_fullscreen();
        drop(panel);

        if was_fullscreen {
            if let Err(e) = self.window.set_fullscreen(false).await {
                tracing::error!(error = %e, "Failed to leave fullscreen");
            }
        }
    }
}
