//! Playback-related types and state

pub const DEFAULT_VOLUME: f32 = 0.7;
pub const VU_METER_BARS: usize = 12;

/// Mutable playback state, owned by the playback controller
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    /// Seconds into the current track
    pub current_time: f64,
    /// Length of the current track in seconds, 0 until metadata arrives
    pub duration: f64,
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackState {
    pub fn progress_ratio(&self) -> f64 {
        if self.duration > 0.0 && self.current_time.is_finite() {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Number of lit VU meter bars. Purely decorative: `jitter` in [0, 1)
/// scales the level between 70% and 100% of the volume.
pub fn level_meter(state: &PlaybackState, jitter: f64) -> usize {
    if !state.is_playing {
        return 0;
    }
    let jitter = jitter.clamp(0.0, 1.0);
    let level = state.volume as f64 * VU_METER_BARS as f64 * (0.7 + jitter * 0.3);
    (level.floor() as usize).min(VU_METER_BARS)
}

/// Complete playback information for rendering the player bar
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    /// `None` when the disc has no tracks
    pub track_name: Option<String>,
    pub track_count: usize,
    pub state: PlaybackState,
    pub level: usize,
}
