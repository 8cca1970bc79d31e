//! Clock-driven output that plays silence for a fixed track length

use std::time::{Duration, Instant};

use super::{MediaError, MediaEvent, MediaOutput};

pub struct SimulatedOutput {
    track_length: Duration,
    source: Option<String>,
    position: Duration,
    playing: bool,
    last_poll: Option<Instant>,
    pending: Vec<MediaEvent>,
}

impl SimulatedOutput {
    pub fn new(track_secs: u64) -> Self {
        Self {
            track_length: Duration::from_secs(track_secs),
            source: None,
            position: Duration::ZERO,
            playing: false,
            last_poll: None,
            pending: Vec::new(),
        }
    }
}

impl MediaOutput for SimulatedOutput {
    fn load(&mut self, uri: &str) {
        tracing::debug!(uri, "Simulated output loading source");
        self.source = Some(uri.to_string());
        self.position = Duration::ZERO;
        self.playing = false;
        self.last_poll = None;
        self.pending.clear();
        self.pending
            .push(MediaEvent::MetadataLoaded(self.track_length.as_secs_f64()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::NoSource);
        }
        self.playing = true;
        self.last_poll = None;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_poll = None;
    }

    fn set_volume(&mut self, volume: f32) {
        tracing::trace!(volume, "Simulated output volume changed");
    }

    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent> {
        if self.playing {
            // Time starts counting at the first poll after play
            if let Some(last) = self.last_poll {
                self.position += now.saturating_duration_since(last);
            }
            self.last_poll = Some(now);

            if self.position >= self.track_length {
                self.position = self.track_length;
                self.playing = false;
                self.last_poll = None;
                self.pending.push(MediaEvent::TimeUpdate(self.position.as_secs_f64()));
                self.pending.push(MediaEvent::Ended);
            } else {
                self.pending.push(MediaEvent::TimeUpdate(self.position.as_secs_f64()));
            }
        }
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_without_source_fails() {
        let mut output = SimulatedOutput::new(10);
        assert!(matches!(output.play(), Err(MediaError::NoSource)));
    }

    #[test]
    fn reports_metadata_time_and_end() {
        let mut output = SimulatedOutput::new(2);
        let t0 = Instant::now();
        output.load("audio/track01.mp3");
        assert_eq!(output.poll_events(t0), vec![MediaEvent::MetadataLoaded(2.0)]);

        output.play().unwrap();
        assert_eq!(output.poll_events(t0), vec![MediaEvent::TimeUpdate(0.0)]);
        assert_eq!(
            output.poll_events(t0 + Duration::from_secs(1)),
            vec![MediaEvent::TimeUpdate(1.0)]
        );

        // paused time does not count
        output.pause();
        assert!(output.poll_events(t0 + Duration::from_secs(30)).is_empty());
        output.play().unwrap();
        output.poll_events(t0 + Duration::from_secs(30));

        assert_eq!(
            output.poll_events(t0 + Duration::from_secs(32)),
            vec![MediaEvent::TimeUpdate(2.0), MediaEvent::Ended]
        );
        assert!(output.poll_events(t0 + Duration::from_secs(40)).is_empty());
    }
}
