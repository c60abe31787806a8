//! Core data types for the beatlab drum machine.
//!
//! This crate defines the step grid, pattern and project model that the
//! editing layer owns and the playback engine reads, plus the tempo and
//! device-time units both sides agree on.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod device_time;
mod grid;
mod pattern;
mod project;
mod tempo;
mod voice;

pub use device_time::DeviceTime;
pub use grid::{StepGrid, STEPS};
pub use pattern::{Pattern, PatternId, PatternName};
pub use project::Project;
pub use tempo::{InvalidTempo, Tempo, DEFAULT_BPM, MAX_BPM, MIN_BPM, STEPS_PER_BEAT};
pub use voice::{UnknownVoice, VoiceId, NUM_VOICES};
