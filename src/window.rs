//! Host window capabilities
//!
//! The shell runs inside a terminal, so "fullscreen" means the game panel
//! takes over the whole terminal instead of sharing it with the sidebar and
//! player bar.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Smallest terminal that can host the fullscreen frame buffer
const MIN_FULLSCREEN_SIZE: (u16, u16) = (80, 24);

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("terminal query failed: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("terminal too small for fullscreen ({width}x{height}, need {min_width}x{min_height})")]
    TooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

#[allow(async_fn_in_trait)]
pub trait HostWindow {
    async fn is_fullscreen(&self) -> Result<bool, WindowError>;

    async fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError>;
}

#[derive(Clone, Debug, Default)]
pub struct TerminalWindow {
    fullscreen: Arc<AtomicBool>,
}

impl TerminalWindow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostWindow for TerminalWindow {
    async fn is_fullscreen(&self) -> Result<bool, WindowError> {
        Ok(self.fullscreen.load(Ordering::Acquire))
    }

    async fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError> {
        if fullscreen {
            let (width, height) = crossterm::terminal::size()?;
            let (min_width, min_height) = MIN_FULLSCREEN_SIZE;
            if width < min_width || height < min_height {
                return Err(WindowError::TooSmall {
                    width,
                    height,
                    min_width,
                    min_height,
                });
            }
        }
        self.fullscreen.store(fullscreen, Ordering::Release);
        tracing::debug!(fullscreen, "Window fullscreen changed");
        Ok(())
    }
}
