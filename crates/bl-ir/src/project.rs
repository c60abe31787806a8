//! The project document: patterns, chain, active selection and tempo.
//!
//! The editing layer owns and mutates a `Project`; the playback core only
//! reads it, once per scheduler tick.

use alloc::format;
use alloc::vec::Vec;
use slotmap::SlotMap;

use crate::grid::StepGrid;
use crate::pattern::{Pattern, PatternId};
use crate::tempo::{InvalidTempo, Tempo};
use crate::voice::VoiceId;

#[derive(Clone, Debug)]
pub struct Project {
    patterns: SlotMap<PatternId, Pattern>,
    /// Display order of patterns.
    order: Vec<PatternId>,
    /// Pattern being edited; not necessarily the one sounding.
    active: Option<PatternId>,
    /// Playback order when chaining; ids may repeat.
    chain: Vec<PatternId>,
    chain_enabled: bool,
    tempo: Tempo,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// A project with one empty "Pattern 1", selected and chained, chaining off.
    pub fn new() -> Self {
        let mut project = Self::empty();
        project.add_pattern(Pattern::new("Pattern 1"));
        project
    }

    /// A project without any patterns. Playback of it is silent.
    pub fn empty() -> Self {
        Self {
            patterns: SlotMap::with_key(),
            order: Vec::new(),
            active: None,
            chain: Vec::new(),
            chain_enabled: false,
            tempo: Tempo::default(),
        }
    }

    // --- Patterns ---

    /// Append a pattern to the order and the chain and make it active.
    pub fn add_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = self.patterns.insert(pattern);
        self.order.push(id);
        self.chain.push(id);
        self.active = Some(id);
        id
    }

    /// Add an empty pattern named "Pattern N".
    pub fn add_empty_pattern(&mut self) -> PatternId {
        let name = format!("Pattern {}", self.order.len() + 1);
        self.add_pattern(Pattern::new(&name))
    }

    /// Delete a pattern and every chain entry naming it.
    ///
    /// The last remaining pattern cannot be deleted. If the active pattern is
    /// removed, the pattern now at its position (or the one before) becomes active.
    pub fn remove_pattern(&mut self, id: PatternId) -> bool {
        if self.order.len() <= 1 {
            return false;
        }
        let Some(index) = self.order.iter().position(|&p| p == id) else {
            return false;
        };
        self.patterns.remove(id);
        self.order.remove(index);
        self.chain.retain(|&p| p != id);
        if self.active == Some(id) {
            let next = self.order.get(index).or_else(|| self.order.get(index.wrapping_sub(1)));
            self.active = next.copied();
        }
        true
    }

    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn pattern_mut(&mut self, id: PatternId) -> Option<&mut Pattern> {
        self.patterns.get_mut(id)
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.patterns.contains_key(id)
    }

    /// Pattern ids in display order.
    pub fn pattern_ids(&self) -> &[PatternId] {
        &self.order
    }

    /// Patterns in display order.
    pub fn patterns(&self) -> impl Iterator<Item = (PatternId, &Pattern)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.patterns.get(id).map(|p| (id, p)))
    }

    pub fn pattern_count(&self) -> usize {
        self.order.len()
    }

    pub fn first_pattern_id(&self) -> Option<PatternId> {
        self.order.first().copied()
    }

    /// Grid for `id`, falling back to the first pattern, then to silence.
    pub fn lookup_grid(&self, id: Option<PatternId>) -> StepGrid {
        id.and_then(|id| self.patterns.get(id))
            .or_else(|| self.first_pattern_id().and_then(|first| self.patterns.get(first)))
            .map_or(StepGrid::silent(), |p| p.grid)
    }

    // --- Active selection ---

    /// The pattern selected for editing, if it still exists.
    pub fn active_pattern_id(&self) -> Option<PatternId> {
        self.active.filter(|&id| self.contains(id))
    }

    /// The pattern selected for editing, falling back to the first pattern.
    pub fn active_pattern(&self) -> Option<&Pattern> {
        self.active_pattern_id()
            .or_else(|| self.first_pattern_id())
            .and_then(|id| self.patterns.get(id))
    }

    /// Select a pattern for editing. Unknown ids are ignored.
    pub fn set_active(&mut self, id: PatternId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Move the selection `offset` places through the display order, wrapping.
    pub fn select_offset(&mut self, offset: isize) -> Option<PatternId> {
        let count = self.order.len() as isize;
        if count == 0 {
            return None;
        }
        let current = self
            .active_pattern_id()
            .and_then(|id| self.order.iter().position(|&p| p == id))
            .unwrap_or(0) as isize;
        let next = self.order[(current + offset).rem_euclid(count) as usize];
        self.active = Some(next);
        Some(next)
    }

    // --- Grid editing on the active pattern ---

    /// Toggle a cell of the active pattern, returning its new value.
    pub fn toggle_step(&mut self, voice: VoiceId, step: usize) -> Option<bool> {
        let id = self.active_pattern_id().or_else(|| self.first_pattern_id())?;
        let pattern = self.patterns.get_mut(id)?;
        Some(pattern.grid.toggle(voice, step))
    }

    /// Clear the active grid and restore the default tempo.
    pub fn reset_grid(&mut self) {
        if let Some(id) = self.active_pattern_id().or_else(|| self.first_pattern_id()) {
            if let Some(pattern) = self.patterns.get_mut(id) {
                pattern.grid.clear();
            }
        }
        self.tempo = Tempo::default();
    }

    // --- Chain ---

    pub fn chain(&self) -> &[PatternId] {
        &self.chain
    }

    pub fn chain_enabled(&self) -> bool {
        self.chain_enabled
    }

    pub fn set_chain_enabled(&mut self, enabled: bool) {
        self.chain_enabled = enabled;
    }

    /// Replace the chain, dropping ids that name no pattern.
    pub fn set_chain(&mut self, chain: impl IntoIterator<Item = PatternId>) {
        self.chain = chain.into_iter().filter(|&id| self.contains(id)).collect();
    }

    pub fn append_to_chain(&mut self, id: PatternId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.chain.push(id);
        true
    }

    /// Move the chain entry at `from` so it lands at `to` (drag-reorder).
    pub fn move_chain_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.chain.len() || to >= self.chain.len() {
            return false;
        }
        let id = self.chain.remove(from);
        self.chain.insert(to, id);
        true
    }

    // --- Tempo ---

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Set the tempo. Invalid input is rejected and the previous tempo kept.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<Tempo, InvalidTempo> {
        self.tempo = Tempo::new(bpm)?;
        Ok(self.tempo)
    }
}
