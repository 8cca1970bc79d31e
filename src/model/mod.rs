//! Model module - Application state and data types
//!
//! This module contains the data structures and state of the shell.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (sections, UI state)
//! - `tracks`: The disc's track list
//! - `playback`: Playback state and the level meter
//! - `loading`: Game loading sequence
//! - `content`: Static disc contents for the video and archive panels
//! - `game`: Game panel snapshot

mod types;
mod tracks;
mod playback;
mod loading;
mod content;
mod game;

// Re-export all public types for convenient access
pub use types::{ActiveSection, UiState};

pub use tracks::{Track, TrackRegistry, default_tracks};

pub use playback::{DEFAULT_VOLUME, PlaybackInfo, PlaybackState, VU_METER_BARS, level_meter};

pub use loading::{LoadingSimulator, Phase, SYSTEM_CHECKS};

pub use content::{
    ARCHIVES, AUDIO_FORMATS, AUDIO_SPECIFICATIONS, ArchiveEntry, QUICK_START, VIDEO_FORMAT,
    VIDEOS, VideoEntry, select_next, select_prev,
};

pub use game::{GameInfo, GameStatus};
