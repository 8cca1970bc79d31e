//! Game bridge - the game panel's loading sequence, content frame and error detection
//!
//! A `GamePanel` exists only while the game section is displayed. Mounting it
//! starts the loading simulator and the hidden content frame; dropping it
//! cancels the timers, unregisters the error sniffer and stops the runtime.

mod frame;
mod protocol;

use std::sync::Arc;
use std::time::{Duration, Instant};
use rand::Rng;

use frame::ContentFrame;
use protocol::ContentProtocol;

use crate::config::GameConfig;
use crate::diagnostics::{Diagnostics, ErrorSniffer, Subscription};
use crate::model::{GameInfo, GameStatus, LoadingSimulator, Phase};
use crate::window::HostWindow;

/// Tracing target for everything the embedded content reports
pub const CONTENT_TARGET: &str = "cd_shell::content";

pub struct GamePanel<R: Rng> {
    loader: LoadingSimulator<R>,
    frame: ContentFrame,
    diagnostics: Diagnostics,
    error_patterns: Vec<String>,
    sniff_delay: Duration,
    sniff_at: Option<Instant>,
    sniffer: Option<(Arc<ErrorSniffer>, Subscription)>,
    error_reported: bool,
    fullscreen: bool,
}

impl<R: Rng> GamePanel<R> {
    pub async fn mount(config: &GameConfig, diagnostics: Diagnostics, rng: R, now: Instant) -> Self {
        let protocol = ContentProtocol::new(&config.content_root);
        let frame = ContentFrame::mount(
            &protocol,
            &config.entry,
            &config.assets,
            config.runtime.as_ref(),
        ).await;

        let mut loader = LoadingSimulator::new(config.loading.clone(), rng);
        loader.start(now);
        tracing::info!("Game panel mounted");

        Self {
            loader,
            frame,
            diagnostics,
            error_patterns: config.error_patterns.clone(),
            sniff_delay: config.sniff_delay(),
            sniff_at: None,
            sniffer: None,
            error_reported: false,
            fullscreen: false,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let phase = self.loader.tick(now);

        if phase == Phase::Ready && !self.frame.is_visible() {
            self.frame.reveal();
            let ready_at = self.loader.ready_at().unwrap_or(now);
            self.sniff_at = Some(ready_at + self.sniff_delay);
        }

        if let Some(at) = self.sniff_at {
            if now >= at {
                self.sniff_at = None;
                self.arm_sniffer();
            }
        }

        if self.has_error() && !self.error_reported {
            self.error_reported = true;
            tracing::warn!("Embedded content failed to load, showing disc read error");
        }
    }

    fn arm_sniffer(&mut self) {
        if self.sniffer.is_some() {
            return;
        }
        let sniffer = Arc::new(ErrorSniffer::new(self.error_patterns.clone()));
        let subscription = self.diagnostics.subscribe(sniffer.clone());
        tracing::debug!(patterns = ?self.error_patterns, "Watching content diagnostics");
        self.sniffer = Some((sniffer, subscription));
        self.frame.load_bundle();
    }

    pub fn has_error(&self) -> bool {
        self.sniffer
            .as_ref()
            .is_some_and(|(sniffer, _)| sniffer.is_tripped())
    }

    #[cfg(test)]
    pub fn is_sniffing(&self) -> bool {
        self.sniffer.is_some()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_content_visible(&self) -> bool {
        self.frame.is_visible()
    }

    /// Fullscreen is only offered once the content is running without errors
    pub fn controls_enabled(&self) -> bool {
        self.loader.is_ready() && !self.has_error()
    }

    pub fn status(&self) -> GameStatus {
        match self.loader.phase() {
            Phase::Idle | Phase::EngineCheck | Phase::Cancelled => GameStatus::Initializing,
            Phase::DiscRead => GameStatus::ReadingDisc,
            Phase::Ready if self.has_error() => GameStatus::ErrorDetected,
            Phase::Ready => GameStatus::RuntimeActive,
        }
    }

    /// Flip the host window's fullscreen state. Failures are logged and leave
    /// the panel unchanged. Leaving fullscreen stays possible after an error.
    pub async fn toggle_fullscreen<W: HostWindow>(&mut self, window: &W) {
        if !self.controls_enabled() && !self.fullscreen {
            tracing::debug!("Fullscreen control disabled");
            return;
        }

        let result = async {
            let fullscreen = window.is_fullscreen().await?;
            window.set_fullscreen(!fullscreen).await?;
            Ok::<bool, crate::window::WindowError>(!fullscreen)
        }
        .await;

        match result {
            Ok(fullscreen) => {
                tracing::info!(fullscreen, "Fullscreen toggled");
                self.fullscreen = fullscreen;
            }
            Err(e) => tracing::error!(error = %e, "Fullscreen toggle failed"),
        }
    }

    pub fn info(&mut self) -> GameInfo {
        GameInfo {
            phase: self.loader.phase(),
            status: self.status(),
            engine_percent: self.loader.engine_percent(),
            status_index: self.loader.status_index(),
            check_label: self.loader.status_label(),
            disc_percent: self.loader.disc_percent(),
            bytes_read: self.loader.bytes_read(),
            total_bytes: self.loader.total_bytes(),
            content_visible: self.is_content_visible(),
            error: self.has_error(),
            fullscreen: self.fullscreen,
            controls_enabled: self.controls_enabled(),
            locator: self.frame.locator().to_string(),
            sandbox: format!(
                "{} | {}",
                self.frame.sandbox().describe(),
                self.frame.permissions().describe()
            ),
            entry_loaded: self.frame.entry_loaded(),
            runtime_running: self.frame.runtime_running(),
        }
    }
}

impl<R: Rng> Drop for GamePanel<R> {
    fn drop(&mut self) {
        self.loader.cancel();
        self.sniff_at = None;
        tracing::info!("Game panel unmounted");
    }
}
