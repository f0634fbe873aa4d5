//! Playback controls over a precomputed timeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timeline::{Seed, Timeline};

/// Speed a fresh or reset session plays at (steps per second).
pub const DEFAULT_SPEED: f64 = 1.0;

/// Interval between autoplay ticks at 1x.
pub const BASE_TICK: Duration = Duration::from_millis(1000);

/// Shortest autoplay period; faster speeds tick at this rate.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Longest autoplay period; slower speeds tick at this rate.
pub const MAX_TICK: Duration = Duration::from_secs(24 * 60 * 60);

/// What an autoplay tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed
    Idle,
    /// Moved forward one step
    Advanced,
    /// Was already at the last step, so playback stopped
    Stopped,
}

/// Playback controller for one visualization session.
///
/// Every transition is total: navigation clamps to `0..=total_steps`, and
/// the only rejected input is a non-positive speed, which leaves the prior
/// speed in place. Reaching the end is not a separate mode; the last step
/// stays fully navigable.
#[derive(Debug, Clone)]
pub struct Playback {
    seed: Seed,
    timeline: Timeline,
    current_step: usize,
    is_playing: bool,
    speed: f64,
}

impl Playback {
    /// Create a paused controller at step 0 for `seed`.
    pub fn new(seed: Seed) -> Self {
        let timeline = Timeline::generate(&seed);
        Self {
            seed,
            timeline,
            current_step: 0,
            is_playing: false,
            speed: DEFAULT_SPEED,
        }
    }

    /// Get the current step number.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Get the last step number.
    pub fn total_steps(&self) -> usize {
        self.timeline.total_steps()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Get the current speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Narration for the current step.
    pub fn current_log(&self) -> &str {
        self.timeline.log(self.current_step).unwrap_or_default()
    }

    /// Array state at the current step.
    pub fn current_snapshot(&self) -> &[i64] {
        self.timeline.snapshot(self.current_step).unwrap_or_default()
    }

    /// Whether the current step is the last one.
    pub fn is_finished(&self) -> bool {
        self.current_step == self.total_steps()
    }

    /// Step forward one step, saturating at the end.
    pub fn next(&mut self) {
        if self.current_step < self.total_steps() {
            self.current_step += 1;
        }
    }

    /// Step backward one step, saturating at 0.
    pub fn prev(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Jump to a step. Out-of-range values clamp rather than fail, so a
    /// slider overshooting its bounds is harmless.
    pub fn seek(&mut self, step: i64) {
        let max = self.total_steps() as i64;
        self.current_step = step.clamp(0, max) as usize;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Set the speed multiplier. Non-positive (or NaN/infinite) values are
    /// rejected and the previous speed is kept.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Regenerate the timeline from the session seed and start over.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed.clone());
    }

    /// Apply one autoplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing {
            return TickOutcome::Idle;
        }
        if self.is_finished() {
            self.toggle_play();
            TickOutcome::Stopped
        } else {
            self.next();
            TickOutcome::Advanced
        }
    }

    /// Autoplay period at the current speed (`1000ms / speed`), clamped
    /// to `MIN_TICK..=MAX_TICK`.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(BASE_TICK.as_secs_f64() / self.speed)
            .map_or(MAX_TICK, |period| period.clamp(MIN_TICK, MAX_TICK))
    }

    /// Calculate progress as a fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        self.current_step as f64 / self.total_steps() as f64
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

/// Read-only playback view for shells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_step: usize,
    pub total_steps: usize,
    pub is_playing: bool,
    pub speed: f64,
    pub progress: f64,
    pub log: String,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        let log = match playback.current_log() {
            "" => "Waiting...".to_string(),
            line => line.to_string(),
        };
        Self {
            current_step: playback.current_step,
            total_steps: playback.total_steps(),
            is_playing: playback.is_playing,
            speed: playback.speed,
            progress: playback.progress(),
            log,
        }
    }
}
