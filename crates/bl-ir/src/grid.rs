//! The fixed 8 × 16 step grid.

use crate::voice::{VoiceId, NUM_VOICES};

/// Steps per pattern (sixteenth notes in one bar).
pub const STEPS: usize = 16;

/// Boolean trigger matrix: one row per voice, one column per step.
///
/// The shape never changes; a `true` cell means "trigger this voice at this
/// step". Out-of-range step indices read as `false` and are ignored on write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StepGrid {
    cells: [[bool; STEPS]; NUM_VOICES],
}

impl StepGrid {
    /// An all-false grid.
    pub const fn silent() -> Self {
        Self { cells: [[false; STEPS]; NUM_VOICES] }
    }

    pub const fn from_rows(cells: [[bool; STEPS]; NUM_VOICES]) -> Self {
        Self { cells }
    }

    pub fn get(&self, voice: VoiceId, step: usize) -> bool {
        step < STEPS && self.cells[voice.index()][step]
    }

    pub fn set(&mut self, voice: VoiceId, step: usize, on: bool) {
        if step < STEPS {
            self.cells[voice.index()][step] = on;
        }
    }

    /// Flip a cell, returning its new value.
    pub fn toggle(&mut self, voice: VoiceId, step: usize) -> bool {
        if step >= STEPS {
            return false;
        }
        let cell = &mut self.cells[voice.index()][step];
        *cell = !*cell;
        *cell
    }

    pub fn clear(&mut self) {
        self.cells = [[false; STEPS]; NUM_VOICES];
    }

    pub fn is_silent(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|&c| !c))
    }

    pub fn row(&self, voice: VoiceId) -> &[bool; STEPS] {
        &self.cells[voice.index()]
    }

    /// Voices that fire at `step`, in row order.
    pub fn voices_at(&self, step: usize) -> impl Iterator<Item = VoiceId> + '_ {
        VoiceId::ALL
            .into_iter()
            .filter(move |&voice| self.get(voice, step))
    }

    /// Number of active cells.
    pub fn active_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}
