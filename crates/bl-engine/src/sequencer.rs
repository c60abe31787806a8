//! Pattern/chain sequencing.
//!
//! Decides which pattern is *live* (sounding) independently of the pattern
//! being edited. Two states:
//!
//! - **Unchained**: the active pattern plays.
//! - **Chained**: the chain plays in order, advancing one entry at every
//!   pattern boundary and wrapping at the end.
//!
//! An empty chain behaves as Unchained. Transitions that move the live
//! pointer to a pattern other than the active one return its id so the
//! caller can notify the editing layer.

use bl_ir::{PatternId, Project, StepGrid};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequencerState {
    #[default]
    Unchained,
    Chained {
        /// Index into the chain of the live entry. `None` until playback
        /// lands on a chain entry; the next boundary then goes to entry 0.
        position: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum JumpError {
    #[error("chain playback is not enabled")]
    NotChained,
    #[error("pattern is not in the chain")]
    NotInChain,
}

#[derive(Clone, Debug, Default)]
pub struct ChainSequencer {
    state: SequencerState,
    /// Live pattern while chained.
    live: Option<PatternId>,
    /// Stale live id already warned about.
    stale: Option<PatternId>,
}

impl ChainSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_chained(&self) -> bool {
        matches!(self.state, SequencerState::Chained { .. })
    }

    /// Follow the project's chain-enabled flag.
    pub fn sync(&mut self, project: &Project) {
        match (project.chain_enabled(), self.is_chained()) {
            (true, false) => self.enable_chain(project),
            (false, true) => self.disable_chain(project),
            _ => {}
        }
    }

    /// Enter Chained. The live pattern keeps playing; the next boundary moves
    /// to the entry after it, or to the first entry if it is not chained.
    pub fn enable_chain(&mut self, project: &Project) {
        if self.is_chained() {
            return;
        }
        let live = self.live.or_else(|| project.active_pattern_id());
        let position = live.and_then(|id| project.chain().iter().position(|c| *c == id));
        self.live = live;
        self.state = SequencerState::Chained { position };
        debug!(?position, "chain enabled");
    }

    /// Return to Unchained; the active pattern plays from here on.
    pub fn disable_chain(&mut self, project: &Project) {
        if !self.is_chained() {
            return;
        }
        self.state = SequencerState::Unchained;
        self.live = project.active_pattern_id();
        debug!("chain disabled");
    }

    /// Forget the playback cursor. Called on stop.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Choose the live pattern for a fresh start.
    ///
    /// Starts from a clean cursor, so a chain head other than the active
    /// pattern is reported on every start.
    pub fn on_start(&mut self, project: &Project) -> Option<PatternId> {
        self.reset();
        self.sync(project);
        let active = project.active_pattern_id();
        let chain = project.chain();
        if !self.is_chained() || chain.is_empty() {
            self.live = active;
            if self.is_chained() {
                self.state = SequencerState::Chained { position: None };
            }
            return None;
        }

        let position = active
            .and_then(|id| chain.iter().position(|c| *c == id))
            .unwrap_or(0);
        self.move_to(position, project)
    }

    /// Pattern boundary: advance to the next chain entry when chained.
    pub fn on_boundary(&mut self, project: &Project) -> Option<PatternId> {
        self.sync(project);
        let len = project.chain().len();
        match self.state {
            SequencerState::Chained { position } if len > 0 => {
                let next = position.map_or(0, |p| (p + 1) % len);
                self.move_to(next, project)
            }
            _ => {
                self.live = project.active_pattern_id();
                None
            }
        }
    }

    /// Jump playback to `id` immediately. Only chain members are accepted.
    pub fn jump_to(&mut self, id: PatternId, project: &Project) -> Result<Option<PatternId>, JumpError> {
        self.sync(project);
        if !self.is_chained() {
            return Err(JumpError::NotChained);
        }
        let position = project
            .chain()
            .iter()
            .position(|c| *c == id)
            .ok_or(JumpError::NotInChain)?;
        Ok(self.move_to(position, project))
    }

    fn move_to(&mut self, position: usize, project: &Project) -> Option<PatternId> {
        let id = *project.chain().get(position)?;
        self.state = SequencerState::Chained { position: Some(position) };
        let changed = self.live != Some(id);
        self.live = Some(id);
        if changed {
            debug!(?id, position, "live pattern changed");
        }
        (changed && project.active_pattern_id() != Some(id)).then_some(id)
    }

    /// The pattern that should sound now.
    pub fn live_pattern(&self, project: &Project) -> Option<PatternId> {
        if !project.chain_enabled() || project.chain().is_empty() {
            return project.active_pattern_id();
        }
        match self.state {
            SequencerState::Chained { .. } => self.live.or_else(|| project.active_pattern_id()),
            SequencerState::Unchained => project.active_pattern_id(),
        }
    }

    /// Grid to read `step` from. Stale ids fall back to the first pattern,
    /// an empty project to silence.
    pub fn grid_for_step(&mut self, step: usize, project: &Project) -> StepGrid {
        let live = self.live_pattern(project);
        match live {
            Some(id) if !project.contains(id) => {
                if self.stale != Some(id) {
                    warn!(?id, step, "live pattern no longer exists, using first pattern");
                    self.stale = Some(id);
                }
            }
            _ => self.stale = None,
        }
        project.lookup_grid(live)
    }
}
