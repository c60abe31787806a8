//! Open-hat choke slot.
//!
//! At most one open hat rings at a time. A closed hat, or a newer open hat,
//! cuts the ringing one short with a fast forced decay instead of a hard stop.

use bl_ir::DeviceTime;
use tracing::trace;

use crate::synth::Hit;

/// Seconds a choked hit takes to ramp to the envelope floor.
pub const CHOKE_TAIL: f64 = 0.03;
/// Seconds after the choke time at which a choked hit stops outright.
pub const CHOKE_STOP: f64 = 0.04;

/// Holds the most recently triggered open hat, if one is still registered.
#[derive(Debug, Default)]
pub struct ChokeSlot {
    current: Option<Hit>,
}

impl ChokeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Hit> {
        self.current.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// Choke the registered open hat at `at` and empty the slot.
    ///
    /// The choked hit is handed back so it can finish its short tail
    /// elsewhere. An empty slot is a no-op.
    pub fn choke(&mut self, at: DeviceTime) -> Option<Hit> {
        let mut hit = self.current.take()?;
        trace!(at = at.as_secs(), "choking open hat");
        hit.choke(at);
        Some(hit)
    }

    /// Register a new open hat, choking the previous one at `at`.
    pub fn replace(&mut self, hit: Hit, at: DeviceTime) -> Option<Hit> {
        let previous = self.choke(at);
        self.current = Some(hit);
        previous
    }

    /// Render the registered hit for `frame`.
    pub fn render(&mut self, frame: u64) -> f32 {
        self.current.as_mut().map_or(0.0, |hit| hit.render(frame))
    }

    /// Empty the slot once its hit has stopped on its own, handing the hit
    /// back to the caller.
    pub fn reap(&mut self, frame: u64) -> Option<Hit> {
        if self.current.as_ref().is_some_and(|hit| hit.is_finished(frame)) {
            return self.current.take();
        }
        None
    }
}
