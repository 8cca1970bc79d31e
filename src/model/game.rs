//! Game panel snapshot for rendering

use super::loading::Phase;

/// Footer status of the game panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Initializing,
    ReadingDisc,
    ErrorDetected,
    RuntimeActive,
}

impl GameStatus {
    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Initializing => "INITIALIZING",
            GameStatus::ReadingDisc => "READING DISC",
            GameStatus::ErrorDetected => "ERROR DETECTED",
            GameStatus::RuntimeActive => "RUNTIME ACTIVE",
        }
    }

    pub fn is_active(self) -> bool {
        self == GameStatus::RuntimeActive
    }
}

#[derive(Clone, Debug)]
pub struct GameInfo {
    pub phase: Phase,
    pub status: GameStatus,
    pub engine_percent: u8,
    pub status_index: usize,
    /// Current system check line
    pub check_label: &'static str,
    pub disc_percent: f64,
    pub bytes_read: u64,
    pub total_bytes: u64,
    pub content_visible: bool,
    pub error: bool,
    pub fullscreen: bool,
    pub controls_enabled: bool,
    pub locator: String,
    pub sandbox: String,
    pub entry_loaded: bool,
    pub runtime_running: bool,
}
