//! Simulated disc loading
//!
//! The game panel hides its content frame behind two fake progress phases:
//! an engine "system check" counter followed by a "disc read" byte counter.
//! Nothing is actually read; the numbers only animate. The machine is driven
//! by [`LoadingSimulator::tick`] with a caller-supplied `now`, so timing is
//! fully deterministic under test.

use std::time::{Duration, Instant};
use rand::Rng;

use crate::config::LoadingConfig;

pub const SYSTEM_CHECKS: [&str; 6] = [
    "INITIALIZING GRAPHICS ENGINE",
    "LOADING GAME ASSETS",
    "CHECKING AUDIO SUBSYSTEM",
    "CONFIGURING INPUT DEVICES",
    "ESTABLISHING GAME BRIDGE",
    "READY TO LAUNCH",
];

/// Observable phase of the loading sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    EngineCheck,
    DiscRead,
    Ready,
    Cancelled,
}

/// Index into [`SYSTEM_CHECKS`] for an engine percentage
pub fn status_index(percent: u8) -> usize {
    let scaled = (percent.min(100) as usize * SYSTEM_CHECKS.len()) / 100;
    scaled.min(SYSTEM_CHECKS.len() - 1)
}

/// Fixed-period timer that fires at `start + period`, `start + 2*period`, ...
#[derive(Clone, Copy, Debug)]
struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    /// Fires at most once, returning the instant the tick was scheduled for
    fn poll(&mut self, now: Instant) -> Option<Instant> {
        if now < self.next_due {
            return None;
        }
        let fired = self.next_due;
        self.next_due += self.period;
        Some(fired)
    }
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    Idle,
    Engine {
        interval: Interval,
        settle_until: Option<Instant>,
    },
    Disc {
        interval: Interval,
        settle_until: Option<Instant>,
    },
    Ready,
    Cancelled,
}

pub struct LoadingSimulator<R> {
    config: LoadingConfig,
    rng: R,
    stage: Stage,
    engine_percent: u8,
    bytes_read: u64,
    ready_at: Option<Instant>,
}

impl<R: Rng> LoadingSimulator<R> {
    pub fn new(config: LoadingConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            stage: Stage::Idle,
            engine_percent: 0,
            bytes_read: 0,
            ready_at: None,
        }
    }

    /// Begin the engine check. Has no effect unless the simulator is idle.
    pub fn start(&mut self, now: Instant) {
        if !matches!(self.stage, Stage::Idle) {
            return;
        }
        tracing::debug!("Loading simulator started");
        self.engine_percent = 0;
        self.bytes_read = 0;
        self.stage = Stage::Engine {
            interval: Interval::starting_at(now, self.config.engine_period()),
            settle_until: None,
        };
    }

    /// Stop both timers. Progress is frozen and the content never becomes visible.
    pub fn cancel(&mut self) {
        if matches!(self.stage, Stage::Engine { .. } | Stage::Disc { .. }) {
            tracing::debug!(
                engine_percent = self.engine_percent,
                bytes_read = self.bytes_read,
                "Loading simulator cancelled"
            );
        }
        if !matches!(self.stage, Stage::Ready) {
            self.stage = Stage::Cancelled;
        }
    }

    /// Process every timer tick due at or before `now`
    pub fn tick(&mut self, now: Instant) -> Phase {
        loop {
            match &mut self.stage {
                Stage::Engine { interval, settle_until } => {
                    if let Some(deadline) = *settle_until {
                        if now < deadline {
                            break;
                        }
                        tracing::debug!("Engine check complete, reading disc");
                        self.stage = Stage::Disc {
                            interval: Interval::starting_at(deadline, self.config.disc_period()),
                            settle_until: None,
                        };
                        continue;
                    }
                    let Some(fired) = interval.poll(now) else {
                        break;
                    };
                    self.engine_percent = self
                        .engine_percent
                        .saturating_add(self.config.engine_step)
                        .min(100);
                    if self.engine_percent >= 100 {
                        *settle_until = Some(fired + self.config.engine_settle());
                    }
                }
                Stage::Disc { interval, settle_until } => {
                    if let Some(deadline) = *settle_until {
                        if now < deadline {
                            break;
                        }
                        tracing::info!(bytes = self.bytes_read, "Disc read complete, revealing content");
                        self.stage = Stage::Ready;
                        self.ready_at = Some(deadline);
                        continue;
                    }
                    let Some(fired) = interval.poll(now) else {
                        break;
                    };
                    let chunk = self
                        .rng
                        .gen_range(self.config.read_min_bytes..=self.config.read_max_bytes);
                    let total = self.config.total_bytes;
                    self.bytes_read = self.bytes_read.saturating_add(chunk).min(total);
                    if self.bytes_read >= total {
                        *settle_until = Some(fired + self.config.disc_settle());
                    }
                }
                Stage::Idle | Stage::Ready | Stage::Cancelled => break,
            }
        }
        self.phase()
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Engine { .. } => Phase::EngineCheck,
            Stage::Disc { .. } => Phase::DiscRead,
            Stage::Ready => Phase::Ready,
            Stage::Cancelled => Phase::Cancelled,
        }
    }

    pub fn engine_percent(&self) -> u8 {
        self.engine_percent
    }

    pub fn disc_percent(&self) -> f64 {
        let total = self.config.total_bytes;
        if total == 0 {
            return 100.0;
        }
        (self.bytes_read as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn total_bytes(&self) -> u64 {
        self.config.total_bytes
    }

    pub fn status_index(&self) -> usize {
        status_index(self.engine_percent)
    }

    pub fn status_label(&self) -> &'static str {
        SYSTEM_CHECKS[self.status_index()]
    }

    /// Instant at which the terminal state was entered
    pub fn ready_at(&self) -> Option<Instant> {
        self.ready_at
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.stage, Stage::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ENGINE_PERIOD: Duration = Duration::from_millis(50);

    fn simulator() -> LoadingSimulator<StdRng> {
        LoadingSimulator::new(LoadingConfig::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut sim = simulator();
        let t0 = Instant::now();
        assert_eq!(sim.tick(t0 + Duration::from_secs(60)), Phase::Idle);
        assert_eq!(sim.engine_percent(), 0);
    }

    #[test]
    fn engine_reaches_100_after_exactly_50_ticks() {
        let mut sim = simulator();
        let t0 = Instant::now();
        sim.start(t0);

        for k in 1..50u32 {
            sim.tick(t0 + ENGINE_PERIOD * k);
            assert_eq!(sim.engine_percent() as u32, k * 2);
        }
        let reached_at = t0 + ENGINE_PERIOD * 50;
        assert_eq!(sim.tick(reached_at), Phase::EngineCheck);
        assert_eq!(sim.engine_percent(), 100);

        // the disc phase waits for the settle delay
        assert_eq!(sim.tick(reached_at + Duration::from_millis(499)), Phase::EngineCheck);
        assert_eq!(sim.tick(reached_at + Duration::from_millis(500)), Phase::DiscRead);
        assert_eq!(sim.bytes_read(), 0);
        assert_eq!(sim.disc_percent(), 0.0);
    }

    #[test]
    fn progress_is_monotonic_and_complete_before_reveal() {
        let mut sim = simulator();
        let t0 = Instant::now();
        sim.start(t0);

        let mut last_engine = 0;
        let mut last_disc = 0.0;
        let mut disc_started = false;
        let mut now = t0;
        let phase = loop {
            now += Duration::from_millis(10);
            let phase = sim.tick(now);

            assert!(sim.engine_percent() >= last_engine);
            assert!(sim.disc_percent() >= last_disc);
            if phase == Phase::DiscRead && !disc_started {
                disc_started = true;
                assert_eq!(last_engine, 100);
            }
            if phase == Phase::Ready {
                assert_eq!(last_disc, 100.0);
                break phase;
            }
            last_engine = sim.engine_percent();
            last_disc = sim.disc_percent();
            assert!(now < t0 + Duration::from_secs(60), "loading never finished");
        };

        assert!(disc_started);
        assert_eq!(phase, Phase::Ready);
        assert_eq!(sim.disc_percent(), 100.0);
        assert_eq!(sim.bytes_read(), sim.total_bytes());
        assert!(sim.ready_at().is_some_and(|at| at <= now));
    }

    #[test]
    fn large_time_jumps_catch_up_in_order() {
        let mut sim = simulator();
        let t0 = Instant::now();
        sim.start(t0);
        assert_eq!(sim.tick(t0 + Duration::from_secs(120)), Phase::Ready);
        assert!(sim.is_ready());
    }

    #[test]
    fn disc_read_takes_a_bounded_number_of_ticks() {
        let config = LoadingConfig::default();
        let mut sim = simulator();
        let t0 = Instant::now();
        sim.start(t0);
        let disc_start = t0 + ENGINE_PERIOD * 50 + config.engine_settle();
        sim.tick(disc_start);

        let mut ticks = 0u64;
        while sim.bytes_read() < sim.total_bytes() {
            ticks += 1;
            sim.tick(disc_start + config.disc_period() * ticks as u32);
        }
        let fewest = config.total_bytes.div_ceil(config.read_max_bytes);
        let most = config.total_bytes.div_ceil(config.read_min_bytes);
        assert!((fewest..=most).contains(&ticks), "took {ticks} ticks");
    }

    #[test]
    fn cancel_freezes_progress() {
        let mut sim = simulator();
        let t0 = Instant::now();
        sim.start(t0);
        sim.tick(t0 + ENGINE_PERIOD * 10);
        assert_eq!(sim.engine_percent(), 20);

        sim.cancel();
        assert_eq!(sim.tick(t0 + Duration::from_secs(120)), Phase::Cancelled);
        assert_eq!(sim.engine_percent(), 20);
        assert!(sim.ready_at().is_none());

        // a cancelled simulator cannot be restarted
        sim.start(t0);
        assert_eq!(sim.phase(), Phase::Cancelled);
    }

    #[test]
    fn status_labels_follow_progress() {
        assert_eq!(status_index(0), 0);
        assert_eq!(status_index(16), 0);
        assert_eq!(status_index(17), 1);
        assert_eq!(status_index(50), 3);
        assert_eq!(status_index(99), 5);
        assert_eq!(status_index(100), 5);
        assert_eq!(SYSTEM_CHECKS[status_index(100)], "READY TO LAUNCH");
    }
}
