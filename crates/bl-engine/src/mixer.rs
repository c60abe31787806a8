//! Render engine.
//!
//! The engine owns the device clock (a running frame counter), the pool of
//! sounding hits and the open-hat choke slot. Hits are inserted ahead of
//! time and stay silent until the clock reaches their start frame, so hits
//! sent early land sample-accurately.
//!
//! [`render_frame`](Engine::render_frame) and
//! [`render_interleaved`](Engine::render_interleaved) neither allocate nor
//! free: hits arrive fully built through [`insert`](Engine::insert), and hits
//! that finish, get stolen or get replaced are parked in a fixed retired list
//! until the host collects them with [`recycle`](Engine::recycle).

use bl_ir::{DeviceTime, VoiceId};
use heapless::Vec as PoolVec;
use tracing::warn;

use crate::choke::ChokeSlot;
use crate::command::VoiceCommand;
use crate::frame::Frame;
use crate::synth::{Hit, HitFactory};

/// Maximum number of hits sounding at once (excluding the registered open hat).
pub const MAX_HITS: usize = 64;

/// Retired hits held between two [`Engine::recycle`] calls.
pub const MAX_RETIRED: usize = 64;

/// Output level applied to the summed voices.
pub const DEFAULT_MASTER_GAIN: f32 = 0.85;

/// The playback engine.
pub struct Engine {
    /// Audio sample rate (e.g., 48000)
    sample_rate: u32,
    /// Frames rendered so far; the device clock
    frames: u64,
    /// Hits that are scheduled or still sounding
    hits: PoolVec<Hit, MAX_HITS>,
    /// The open hat a closed hat would choke
    open_hat: ChokeSlot,
    /// Hits done sounding, waiting to be dropped off the render path
    retired: PoolVec<Hit, MAX_RETIRED>,
    /// Builds hits for [`trigger`](Self::trigger)
    factory: HitFactory,
    master_gain: f32,
}

impl Engine {
    /// Create an engine rendering at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self::with_factory(HitFactory::new(sample_rate))
    }

    /// Create an engine with deterministic noise.
    pub fn with_seed(sample_rate: u32, seed: u64) -> Self {
        Self::with_factory(HitFactory::with_seed(sample_rate, seed))
    }

    fn with_factory(factory: HitFactory) -> Self {
        Self {
            sample_rate: factory.sample_rate(),
            frames: 0,
            hits: PoolVec::new(),
            open_hat: ChokeSlot::new(),
            retired: PoolVec::new(),
            factory,
            master_gain: DEFAULT_MASTER_GAIN,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain.max(0.0);
    }

    /// Current device time: the start of the next frame to be rendered.
    pub fn current_time(&self) -> DeviceTime {
        DeviceTime::from_frames(self.frames, self.sample_rate)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Number of pooled hits, not counting the registered open hat.
    pub fn active_hits(&self) -> usize {
        self.hits.len()
    }

    pub fn open_hat(&self) -> Option<&Hit> {
        self.open_hat.current()
    }

    /// Hits parked for [`recycle`](Self::recycle).
    pub fn retired_hits(&self) -> usize {
        self.retired.len()
    }

    pub fn handle(&mut self, command: VoiceCommand) {
        self.trigger(command.voice, command.at);
    }

    /// Build `voice` and schedule it to sound at device time `at`.
    ///
    /// Allocates the hit's noise; real-time hosts build hits elsewhere and
    /// use [`insert`](Self::insert).
    pub fn trigger(&mut self, voice: VoiceId, at: DeviceTime) {
        match self.factory.build(voice, at) {
            Ok(hit) => self.insert(hit),
            Err(err) => warn!(%voice, error = %err, "dropping hit"),
        }
    }

    /// Schedule a built hit. A start already in the past plays from the next
    /// rendered frame.
    pub fn insert(&mut self, hit: Hit) {
        let at = hit.start();
        match hit.voice() {
            VoiceId::ClosedHat => {
                if let Some(choked) = self.open_hat.choke(at) {
                    self.push(choked);
                }
                self.push(hit);
            }
            VoiceId::OpenHat => {
                if let Some(previous) = self.open_hat.replace(hit, at) {
                    self.push(previous);
                }
            }
            _ => self.push(hit),
        }
    }

    fn push(&mut self, hit: Hit) {
        if let Err(hit) = self.hits.push(hit) {
            // Pool full: steal the hit that started first.
            let oldest = self
                .hits
                .iter()
                .enumerate()
                .min_by_key(|(_, h)| h.start_frame())
                .map(|(i, _)| i);
            if let Some(index) = oldest {
                let stolen = self.hits.swap_remove(index);
                self.retire(stolen);
            }
            let _ = self.hits.push(hit);
        }
    }

    fn retire(&mut self, hit: Hit) {
        // A full list means the host stopped recycling; dropping here frees.
        let _ = self.retired.push(hit);
    }

    /// Hand retired hits to `sink` until it refuses one or none are left.
    ///
    /// A refused hit stays parked for the next call. Returns how many were
    /// handed over.
    pub fn recycle(&mut self, mut sink: impl FnMut(Hit) -> Result<(), Hit>) -> usize {
        let mut handed = 0;
        while let Some(hit) = self.retired.pop() {
            if let Err(hit) = sink(hit) {
                let _ = self.retired.push(hit);
                break;
            }
            handed += 1;
        }
        handed
    }

    /// Render one frame and advance the device clock.
    pub fn render_frame(&mut self) -> Frame {
        let frame = self.frames;

        let mut out = Frame::mono(self.open_hat.render(frame));
        for hit in self.hits.iter_mut() {
            out.mix(Frame::mono(hit.render(frame)));
        }

        self.frames += 1;
        let next = self.frames;
        let mut i = 0;
        while i < self.hits.len() {
            if self.hits[i].is_finished(next) {
                let hit = self.hits.swap_remove(i);
                self.retire(hit);
            } else {
                i += 1;
            }
        }
        if let Some(hat) = self.open_hat.reap(next) {
            self.retire(hat);
        }

        out.scale(self.master_gain)
    }

    /// Render `count` frames, dropping retired hits as they come.
    ///
    /// Allocates; for offline rendering and tests.
    pub fn render_frames(&mut self, count: usize) -> Vec<Frame> {
        (0..count)
            .map(|_| {
                let frame = self.render_frame();
                self.retired.clear();
                frame
            })
            .collect()
    }

    /// Fill an interleaved output buffer with `channels` channels per frame.
    ///
    /// Mono devices get the left channel; channels past the second are silent.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for chunk in out.chunks_mut(channels) {
            let frame = self.render_frame();
            for (ch, sample) in chunk.iter_mut().enumerate() {
                *sample = match ch {
                    0 => frame.left,
                    1 => frame.right,
                    _ => 0.0,
                };
            }
        }
    }
}
