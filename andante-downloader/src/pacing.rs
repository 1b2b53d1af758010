//! Adaptive pacing between automated actions.
//!
//! Keeps the session's cadence human-shaped: mostly short randomized
//! waits, occasionally an extended one, and a long break once the reset
//! deadline passes. Pause/resume excludes externally-blocked time (a
//! human solving a challenge) from the budget: paused intervals are
//! added back onto the deadline on resume.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

/// Wait ranges and escalation interval. Injectable so tests can run at
/// millisecond scale.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// How far the deadline moves after a long break.
    pub reset_interval: Duration,
    /// Usual between-action wait.
    pub short_wait: (Duration, Duration),
    /// Occasional longer pause, drawn with `extended_chance`.
    pub extended_wait: (Duration, Duration),
    /// The long break taken once the deadline passes.
    pub long_wait: (Duration, Duration),
    pub extended_chance: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            reset_interval: Duration::from_secs(10 * 60),
            short_wait: (Duration::from_secs(2), Duration::from_secs(15)),
            extended_wait: (Duration::from_secs(16), Duration::from_secs(60)),
            long_wait: (Duration::from_secs(120), Duration::from_secs(600)),
            extended_chance: 0.1,
        }
    }
}

/// Decides how long to block between automated actions.
///
/// Cannot fail, only delay. All arithmetic is on the monotonic clock.
pub struct Pacer {
    config: PacingConfig,
    last_reset: Instant,
    next_reset: Instant,
    paused_at: Option<Instant>,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        let now = Instant::now();
        let next_reset = now + config.reset_interval;
        info!(
            "Pacing engine started; next long break in {} minutes",
            config.reset_interval.as_secs() / 60
        );
        Self {
            config,
            last_reset: now,
            next_reset,
            paused_at: None,
        }
    }

    /// Block for at least `minimum`. No-op while paused.
    pub fn wait(&mut self, minimum: Duration) {
        self.wait_inner(minimum, false);
    }

    /// Like [`wait`](Self::wait) but never draws an extended wait.
    pub fn quick_wait(&mut self, minimum: Duration) {
        self.wait_inner(minimum, true);
    }

    fn wait_inner(&mut self, minimum: Duration, quick: bool) {
        if self.paused_at.is_some() {
            return;
        }

        if Instant::now() >= self.next_reset {
            let wait = Self::draw(self.config.long_wait).max(minimum);
            info!("Taking a long break: {} seconds", wait.as_secs());
            std::thread::sleep(wait);
            self.reset();
            return;
        }

        let range = if !quick && rand::thread_rng().gen_bool(self.config.extended_chance) {
            self.config.extended_wait
        } else {
            self.config.short_wait
        };
        let wait = Self::draw(range).max(minimum);
        debug!("Waiting {:.1} seconds", wait.as_secs_f64());
        std::thread::sleep(wait);
    }

    fn draw((lo, hi): (Duration, Duration)) -> Duration {
        let lo = lo.as_millis() as u64;
        let hi = hi.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi.max(lo)))
    }

    fn reset(&mut self) {
        self.last_reset = Instant::now();
        self.next_reset = self.last_reset + self.config.reset_interval;
        info!(
            "Pacing budget reset; next long break in {} minutes",
            self.config.reset_interval.as_secs() / 60
        );
    }

    /// Mark the start of an externally-blocked interval. Idempotent.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
            debug!("Pacing paused");
        }
    }

    /// End an externally-blocked interval: the paused duration is added
    /// back onto the reset deadline. No-op when not paused.
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused = paused_at.elapsed();
            self.next_reset += paused;
            debug!("Pacing resumed after {:.1}s", paused.as_secs_f64());
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Remaining budget before the next long break.
    pub fn time_until_reset(&self) -> Duration {
        self.next_reset.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
#[path = "tests/pacing_tests.rs"]
mod tests;
