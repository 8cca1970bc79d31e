//! Playback control
//!
//! `PlaybackController` owns the playback state and is the only thing that
//! talks to the media output. It lives for the whole session, independent of
//! which panel is displayed.

use std::time::Instant;

use crate::audio::{MediaEvent, MediaOutput};
use crate::model::{PlaybackInfo, PlaybackState, Track, TrackRegistry, level_meter};

pub struct PlaybackController<O> {
    registry: TrackRegistry,
    output: O,
    state: PlaybackState,
}

impl<O: MediaOutput> PlaybackController<O> {
    pub fn new(registry: TrackRegistry, mut output: O, volume: f32) -> Self {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        output.set_volume(volume);

        let mut controller = Self {
            registry,
            output,
            state: PlaybackState {
                volume,
                ..Default::default()
            },
        };
        controller.load_current();
        controller
    }

    #[cfg(test)]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.registry.get(self.state.current_index)
    }

    #[cfg(test)]
    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn toggle_play_pause(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        if self.state.is_playing {
            self.output.pause();
            self.state.is_playing = false;
            tracing::info!(index = self.state.current_index, "Playback paused");
        } else {
            self.start_output();
        }
    }

    pub fn next_track(&mut self) {
        let Some(last) = self.registry.last_index() else {
            return;
        };
        if self.state.current_index >= last {
            tracing::debug!("Already at last track");
            return;
        }
        self.select(self.state.current_index + 1);
    }

    pub fn previous_track(&mut self) {
        if self.registry.is_empty() || self.state.current_index == 0 {
            tracing::debug!("Already at first track");
            return;
        }
        self.select(self.state.current_index - 1);
    }

    /// Set the output volume. Out-of-range values are clamped, NaN is rejected.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            tracing::warn!(volume, "Ignoring non-finite volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.output.set_volume(volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Apply every event the output produced since the last poll
    pub fn poll(&mut self, now: Instant) {
        for event in self.output.poll_events(now) {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(secs) => {
                if secs.is_finite() && secs >= 0.0 {
                    self.state.current_time = secs;
                }
            }
            MediaEvent::MetadataLoaded(secs) => {
                if secs.is_finite() && secs >= 0.0 {
                    self.state.duration = secs;
                }
            }
            MediaEvent::Ended => self.on_track_ended(),
        }
    }

    /// Snapshot for rendering. `jitter` in [0, 1) animates the level meter.
    pub fn info(&self, jitter: f64) -> PlaybackInfo {
        PlaybackInfo {
            track_name: self.current_track().map(|t| t.name.clone()),
            track_count: self.registry.len(),
            state: self.state.clone(),
            level: level_meter(&self.state, jitter),
        }
    }

    fn on_track_ended(&mut self) {
        let index = self.state.current_index;
        match self.registry.last_index() {
            Some(last) if index < last => {
                tracing::info!(index, "Track ended, advancing");
                self.select(index + 1);
            }
            _ => {
                tracing::info!("Last track ended, rewinding disc");
                self.state.is_playing = false;
                self.state.current_index = 0;
                self.load_current();
            }
        }
    }

    fn select(&mut self, index: usize) {
        self.state.current_index = index;
        self.load_current();
        if self.state.is_playing {
            self.start_output();
        }
    }

    fn load_current(&mut self) {
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        if let Some(track) = self.registry.get(self.state.current_index) {
            tracing::debug!(index = self.state.current_index, track = %track.name, "Loading track");
            self.output.load(&track.path);
        }
    }

    fn start_output(&mut self) {
        match self.output.play() {
            Ok(()) => {
                self.state.is_playing = true;
                tracing::info!(index = self.state.current_index, "Playback started");
            }
            Err(e) => {
                self.state.is_playing = false;
                tracing::error!(error = %e, index = self.state.current_index, "Playback error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MediaError;
    use crate::model::default_tracks;

    #[derive(Default)]
    struct MockOutput {
        commands: Vec<String>,
        fail_play: bool,
        queued: Vec<MediaEvent>,
        volume: f32,
    }

    impl MediaOutput for MockOutput {
        fn load(&mut self, uri: &str) {
            self.commands.push(format!("load {uri}"));
        }

        fn play(&mut self) -> Result<(), MediaError> {
            self.commands.push("play".to_string());
            if self.fail_play { Err(MediaError::NoSource) } else { Ok(()) }
        }

        fn pause(&mut self) {
            self.commands.push("pause".to_string());
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn poll_events(&mut self, _now: Instant) -> Vec<MediaEvent> {
            std::mem::take(&mut self.queued)
        }
    }

    fn controller() -> PlaybackController<MockOutput> {
        PlaybackController::new(TrackRegistry::default(), MockOutput::default(), 0.7)
    }

    fn at(index: usize, playing: bool) -> PlaybackController<MockOutput> {
        let mut c = controller();
        c.state.current_index = index;
        c.state.is_playing = playing;
        c
    }

    #[test]
    fn construction_loads_first_track_and_volume() {
        let c = controller();
        assert_eq!(c.output().commands, vec!["load audio/track01.mp3"]);
        assert_eq!(c.output().volume, 0.7);
        assert_eq!(c.state().current_index, 0);
        assert!(!c.state().is_playing);
    }

    #[test]
    fn next_track_walks_to_the_last_track_and_stops() {
        let mut c = controller();
        for expected in 1..=4 {
            c.next_track();
            assert_eq!(c.state().current_index, expected);
        }
        c.next_track();
        assert_eq!(c.state().current_index, 4);
    }

    #[test]
    fn next_and_previous_are_noops_at_the_boundaries() {
        for i in 0..5 {
            let mut c = at(i, false);
            c.next_track();
            assert_eq!(c.state().current_index, if i == 4 { 4 } else { i + 1 });

            let mut c = at(i, false);
            c.previous_track();
            assert_eq!(c.state().current_index, i.saturating_sub(1));
        }
    }

    #[test]
    fn changing_track_while_playing_resumes_playback() {
        let mut c = at(1, true);
        c.next_track();
        assert!(c.state().is_playing);
        assert_eq!(
            c.output().commands[1..],
            ["load audio/track03.mp3".to_string(), "play".to_string()]
        );

        let mut stopped = at(1, false);
        stopped.previous_track();
        assert_eq!(stopped.output().commands.last().map(String::as_str), Some("load audio/track01.mp3"));
        assert!(!stopped.state().is_playing);
    }

    #[test]
    fn toggle_plays_and_pauses() {
        let mut c = controller();
        c.toggle_play_pause();
        assert!(c.state().is_playing);
        c.toggle_play_pause();
        assert!(!c.state().is_playing);
        assert_eq!(c.output().commands[1..], ["play".to_string(), "pause".to_string()]);
    }

    #[test]
    fn rejected_play_leaves_playback_stopped() {
        let output = MockOutput { fail_play: true, ..Default::default() };
        let mut c = PlaybackController::new(TrackRegistry::default(), output, 0.7);
        c.toggle_play_pause();
        assert!(!c.state().is_playing);
    }

    #[test]
    fn end_of_last_track_rewinds_and_stops() {
        let mut c = at(4, true);
        c.handle_event(MediaEvent::Ended);
        assert_eq!(c.state().current_index, 0);
        assert!(!c.state().is_playing);
        assert_eq!(c.output().commands.last().map(String::as_str), Some("load audio/track01.mp3"));
    }

    #[test]
    fn end_of_earlier_track_advances_and_keeps_playing() {
        for i in 0..4 {
            let mut c = at(i, true);
            c.handle_event(MediaEvent::Ended);
            assert_eq!(c.state().current_index, i + 1);
            assert!(c.state().is_playing);
        }
    }

    #[test]
    fn volume_is_clamped_and_independent_of_play_state() {
        let mut c = at(0, true);
        c.set_volume(1.5);
        assert_eq!(c.state().volume, 1.0);
        assert!(c.state().is_playing);

        c.set_volume(-0.2);
        assert_eq!(c.state().volume, 0.0);
        assert_eq!(c.output().volume, 0.0);

        c.set_volume(f32::NAN);
        assert_eq!(c.state().volume, 0.0);

        let mut stopped = at(0, false);
        stopped.adjust_volume(0.1);
        assert!(!stopped.state().is_playing);
        assert!((stopped.state().volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn polled_events_update_time_and_duration() {
        let mut c = controller();
        c.output.queued = vec![
            MediaEvent::MetadataLoaded(200.0),
            MediaEvent::TimeUpdate(3.0),
            MediaEvent::TimeUpdate(3.0),
            MediaEvent::TimeUpdate(f64::NAN),
        ];
        c.poll(Instant::now());
        assert_eq!(c.state().duration, 200.0);
        assert_eq!(c.state().current_time, 3.0);
    }

    #[test]
    fn changing_track_resets_time() {
        let mut c = controller();
        c.handle_event(MediaEvent::MetadataLoaded(100.0));
        c.handle_event(MediaEvent::TimeUpdate(42.0));
        c.next_track();
        assert_eq!(c.state().current_time, 0.0);
        assert_eq!(c.state().duration, 0.0);
    }

    #[test]
    fn empty_disc_ignores_every_command() {
        let mut c = PlaybackController::new(TrackRegistry::new(Vec::new()), MockOutput::default(), 0.7);
        c.toggle_play_pause();
        c.next_track();
        c.previous_track();
        c.handle_event(MediaEvent::Ended);
        assert!(!c.state().is_playing);
        assert_eq!(c.state().current_index, 0);
        assert!(c.output().commands.is_empty());
        assert!(c.info(0.5).track_name.is_none());
    }

    #[test]
    fn info_reports_meter_only_while_playing() {
        let tracks = default_tracks();
        let mut c = controller();
        assert_eq!(c.info(0.5).level, 0);
        c.toggle_play_pause();
        let info = c.info(0.5);
        assert!(info.level > 0);
        assert_eq!(info.track_count, tracks.len());
        assert_eq!(info.track_name.as_deref(), Some(tracks[0].name.as_str()));
    }
}
