//! Playback engine for the beatlab drum machine.
//!
//! Holds the eight procedural voice recipes and their primitives, the
//! open-hat choke slot, the render engine that mixes hits against the device
//! clock, and the two timing components the transport drives: the lookahead
//! scheduler and the pattern/chain sequencer.

mod choke;
mod command;
mod envelope;
mod error;
mod filter;
mod frame;
mod mixer;
mod noise;
mod oscillator;
pub mod scheduler;
pub mod sequencer;
pub mod synth;

pub use choke::{ChokeSlot, CHOKE_STOP, CHOKE_TAIL};
pub use command::VoiceCommand;
pub use envelope::{DecayEnvelope, ENVELOPE_FLOOR};
pub use error::SynthError;
pub use filter::{Filter, FilterKind};
pub use frame::Frame;
pub use mixer::{Engine, DEFAULT_MASTER_GAIN, MAX_HITS, MAX_RETIRED};
pub use noise::NoiseBuffer;
pub use oscillator::{FrequencySweep, Oscillator, Waveform};
pub use scheduler::{LookaheadScheduler, ScheduledStep};
pub use sequencer::{ChainSequencer, JumpError, SequencerState};
pub use synth::{Hit, HitFactory};
