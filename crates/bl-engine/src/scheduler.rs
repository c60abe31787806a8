//! Lookahead step scheduling.
//!
//! The host calls [`LookaheadScheduler::poll`] from a coarse periodic tick.
//! Each call hands out the next step whose device time falls inside the
//! lookahead window; the caller keeps polling until `None`, so every due step
//! is scheduled even if the host stalled for several step lengths.
//!
//! Step times are accumulated from the previous step's target time, never
//! from "now", so host jitter never reaches the audio timeline.

use bl_ir::{DeviceTime, Tempo, STEPS};
use tracing::trace;

/// Default lookahead window, in seconds.
pub const DEFAULT_LOOKAHEAD: f64 = 0.1;
/// Default delay between `start` and the first step, in seconds.
pub const DEFAULT_START_LEAD: f64 = 0.05;

/// A step that is due for scheduling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledStep {
    /// Step index, `0..STEPS`.
    pub step: usize,
    /// Exact device time the step sounds at.
    pub time: DeviceTime,
    /// The cursor wrapped back to step 0 after this step: a pattern boundary.
    pub wrapped: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cursor {
    step: usize,
    next_time: DeviceTime,
}

/// Converts tempo into device-time step positions ahead of playback.
#[derive(Clone, Debug)]
pub struct LookaheadScheduler {
    lookahead: f64,
    start_lead: f64,
    /// `None` while stopped.
    cursor: Option<Cursor>,
}

impl Default for LookaheadScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD, DEFAULT_START_LEAD)
    }
}

impl LookaheadScheduler {
    pub fn new(lookahead: f64, start_lead: f64) -> Self {
        Self {
            lookahead: lookahead.max(0.0),
            start_lead: start_lead.max(0.0),
            cursor: None,
        }
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    pub fn start_lead(&self) -> f64 {
        self.start_lead
    }

    /// Begin a new timeline at step 0, `start_lead` after `now`.
    ///
    /// Returns `false` (and changes nothing) if already running.
    pub fn start(&mut self, now: DeviceTime) -> bool {
        if self.cursor.is_some() {
            return false;
        }
        self.cursor = Some(Cursor {
            step: 0,
            next_time: now.add_secs(self.start_lead),
        });
        true
    }

    /// Discard the timeline. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        self.cursor.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.cursor.is_some()
    }

    /// Index of the next step to be scheduled; 0 while stopped.
    pub fn current_step(&self) -> usize {
        self.cursor.map_or(0, |c| c.step)
    }

    pub fn next_step_time(&self) -> Option<DeviceTime> {
        self.cursor.map(|c| c.next_time)
    }

    /// Return the next step if it falls before `now + lookahead`, advancing
    /// the cursor past it.
    pub fn poll(&mut self, now: DeviceTime, tempo: Tempo) -> Option<ScheduledStep> {
        let cursor = self.cursor?;
        if cursor.next_time.as_secs() >= now.as_secs() + self.lookahead {
            return None;
        }
        let wrapped = self.advance_step(tempo);
        trace!(step = cursor.step, time = cursor.next_time.as_secs(), "step due");
        Some(ScheduledStep {
            step: cursor.step,
            time: cursor.next_time,
            wrapped,
        })
    }

    /// Move the cursor one step forward at `tempo`.
    ///
    /// Returns `true` when the cursor wrapped back to step 0.
    pub fn advance_step(&mut self, tempo: Tempo) -> bool {
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        cursor.next_time = cursor.next_time.add_secs(tempo.step_duration());
        cursor.step = (cursor.step + 1) % STEPS;
        cursor.step == 0
    }
}
