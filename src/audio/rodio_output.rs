//! Audio output using rodio

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{MediaError, MediaEvent, MediaOutput};

/// Plays decoded files on the default audio device.
///
/// `OutputStream` is not `Send`, so this output stays on the UI task.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source: Option<PathBuf>,
    volume: f32,
    position: Duration,
    playing: bool,
    last_poll: Option<Instant>,
    pending: Vec<MediaEvent>,
}

impl RodioOutput {
    pub fn new() -> Result<Self, MediaError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| MediaError::Device(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            source: None,
            volume: 1.0,
            position: Duration::ZERO,
            playing: false,
            last_poll: None,
            pending: Vec::new(),
        })
    }

    /// Decode the loaded file into a fresh sink
    fn open_sink(&self, path: &Path) -> Result<(Sink, Option<Duration>), MediaError> {
        let file = File::open(path).map_err(|source| MediaError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let duration = decoder.total_duration();

        let sink = Sink::try_new(&self.handle).map_err(|e| MediaError::Device(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.pause();
        sink.append(decoder);
        Ok((sink, duration))
    }
}

impl MediaOutput for RodioOutput {
    fn load(&mut self, uri: &str) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        tracing::debug!(uri, "Loading audio source");
        self.source = Some(PathBuf::from(uri));
        self.position = Duration::ZERO;
        self.playing = false;
        self.last_poll = None;
        self.pending.clear();
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.sink.is_none() {
            let path = self.source.clone().ok_or(MediaError::NoSource)?;
            let (sink, duration) = self.open_sink(&path)?;
            if let Some(duration) = duration {
                self.pending.push(MediaEvent::MetadataLoaded(duration.as_secs_f64()));
            }
            self.sink = Some(sink);
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.playing = true;
        self.last_poll = None;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.playing = false;
        self.last_poll = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent> {
        if self.playing {
            if let Some(last) = self.last_poll {
                self.position += now.saturating_duration_since(last);
            }
            self.last_poll = Some(now);
            self.pending.push(MediaEvent::TimeUpdate(self.position.as_secs_f64()));

            if self.sink.as_ref().is_some_and(|sink| sink.empty()) {
                self.sink = None;
                self.playing = false;
                self.last_poll = None;
                self.pending.push(MediaEvent::Ended);
            }
        }
        std::mem::take(&mut self.pending)
    }
}
