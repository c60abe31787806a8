//! Named step patterns.

use arrayvec::ArrayString;

use crate::grid::{StepGrid, STEPS};

slotmap::new_key_type! {
    /// Stable identity of a pattern; never reused after deletion.
    pub struct PatternId;
}

/// Fixed-capacity pattern display name.
pub type PatternName = ArrayString<32>;

/// A named 16-step grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub name: PatternName,
    pub grid: StepGrid,
    /// Steps per pattern; always `STEPS` for this machine.
    pub length_steps: u8,
}

impl Pattern {
    /// Create an empty pattern. Names longer than the capacity are truncated.
    pub fn new(name: &str) -> Self {
        Self::with_grid(name, StepGrid::silent())
    }

    pub fn with_grid(name: &str, grid: StepGrid) -> Self {
        Self {
            name: truncated_name(name),
            grid,
            length_steps: STEPS as u8,
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = truncated_name(name);
    }
}

fn truncated_name(name: &str) -> PatternName {
    let mut out = PatternName::new();
    for c in name.trim().chars() {
        if out.try_push(c).is_err() {
            break;
        }
    }
    out
}
