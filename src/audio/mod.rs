//! Media output backends
//!
//! The playback controller drives a single [`MediaOutput`]. Outputs never call
//! back into the controller; they queue [`MediaEvent`]s that the controller
//! drains once per UI cycle with [`MediaOutput::poll_events`].

mod simulated;
#[cfg(feature = "audio")]
mod rodio_output;

use std::path::PathBuf;
use std::time::Instant;

pub use simulated::SimulatedOutput;
#[cfg(feature = "audio")]
pub use rodio_output::RodioOutput;

use crate::config::ShellConfig;

#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    /// Playback position in seconds
    TimeUpdate(f64),
    /// Track length in seconds, known once the source is opened
    MetadataLoaded(f64),
    Ended,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub enum MediaError {
    #[error("no track loaded")]
    NoSource,
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("audio device unavailable: {0}")]
    Device(String),
}

pub trait MediaOutput {
    /// Replace the current source. Playback is stopped until `play` is called.
    fn load(&mut self, uri: &str);

    /// Start or resume playback of the loaded source
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn set_volume(&mut self, volume: f32);

    /// Drain events produced since the previous poll
    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent>;
}

impl<T: MediaOutput + ?Sized> MediaOutput for Box<T> {
    fn load(&mut self, uri: &str) {
        (**self).load(uri)
    }

    fn play(&mut self) -> Result<(), MediaError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent> {
        (**self).poll_events(now)
    }
}

/// Pick the output for this build
#[cfg(feature = "audio")]
pub fn open_output(config: &ShellConfig) -> Box<dyn MediaOutput> {
    match RodioOutput::new() {
        Ok(output) => {
            tracing::info!("Using rodio audio output");
            Box::new(output)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Audio device unavailable, falling back to simulated output");
            Box::new(SimulatedOutput::new(config.simulated_track_secs))
        }
    }
}

#[cfg(not(feature = "audio"))]
pub fn open_output(config: &ShellConfig) -> Box<dyn MediaOutput> {
    tracing::info!("Built without audio support, using simulated output");
    Box::new(SimulatedOutput::new(config.simulated_track_secs))
}
