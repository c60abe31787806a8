//! Tempo and step-duration arithmetic.

use crate::grid::STEPS;

/// Slowest accepted tempo; finite positive values below this are raised to it.
pub const MIN_BPM: f64 = 20.0;
/// Fastest accepted tempo; values above this are lowered to it.
pub const MAX_BPM: f64 = 300.0;
pub const DEFAULT_BPM: f64 = 120.0;
/// Steps are sixteenth notes against a quarter-note beat.
pub const STEPS_PER_BEAT: f64 = 4.0;

/// Tempo in quarter notes per minute, always within `MIN_BPM..=MAX_BPM`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Tempo(f64);

/// A tempo that is zero, negative or not a number.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("invalid tempo {0}: must be a positive, finite number of beats per minute")]
pub struct InvalidTempo(pub f64);

impl Tempo {
    /// Validate `bpm`, clamping finite positive values into range.
    pub fn new(bpm: f64) -> Result<Self, InvalidTempo> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(InvalidTempo(bpm));
        }
        Ok(Self(bpm.clamp(MIN_BPM, MAX_BPM)))
    }

    pub const fn bpm(self) -> f64 {
        self.0
    }

    /// Seconds per step: `60 / bpm / 4`.
    pub fn step_duration(self) -> f64 {
        60.0 / self.0 / STEPS_PER_BEAT
    }

    /// Seconds per full 16-step cycle.
    pub fn cycle_duration(self) -> f64 {
        self.step_duration() * STEPS as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_BPM)
    }
}

impl TryFrom<f64> for Tempo {
    type Error = InvalidTempo;

    fn try_from(bpm: f64) -> Result<Self, Self::Error> {
        Tempo::new(bpm)
    }
}
