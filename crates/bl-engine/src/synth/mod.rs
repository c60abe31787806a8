//! Per-voice synthesis recipes.
//!
//! Every trigger builds a fresh [`Hit`]: a small signal graph of one or two
//! branches (oscillator or noise, optional filters, decay envelope) that is
//! scheduled to begin at an absolute device time and stops itself after a
//! voice-specific duration. Sequenced steps and manual pad hits both come
//! through [`build_hit`], so a voice sounds the same whatever triggered it.
//!
//! Building a hit allocates its noise buffer, so real-time hosts build hits
//! with a [`HitFactory`] on the control thread and hand the finished [`Hit`]
//! to the render thread.

mod clap;
mod hats;
mod kick;
mod perc;
mod rim;
mod snare;
mod tom;

use arrayvec::ArrayVec;
use bl_ir::{DeviceTime, VoiceId};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::envelope::DecayEnvelope;
use crate::error::SynthError;
use crate::filter::Filter;
use crate::noise::NoiseBuffer;
use crate::oscillator::Oscillator;

/// Longest lifetime of any voice, in seconds.
pub const MAX_HIT_SECONDS: f64 = 0.25;

const MAX_BRANCHES: usize = 2;
const MAX_FILTERS: usize = 2;

/// What a recipe needs from the engine: the output rate and a noise source.
pub struct HitContext<'a> {
    pub sample_rate: u32,
    pub rng: &'a mut SmallRng,
}

impl<'a> HitContext<'a> {
    pub fn new(sample_rate: u32, rng: &'a mut SmallRng) -> Self {
        Self { sample_rate, rng }
    }

    fn noise(&mut self, seconds: f64) -> NoiseBuffer {
        NoiseBuffer::for_duration(self.rng, self.sample_rate, seconds)
    }

    fn highpass(&self, cutoff_hz: f32) -> Result<Filter, SynthError> {
        Filter::highpass(cutoff_hz, self.sample_rate)
    }

    fn bandpass(&self, center_hz: f32) -> Result<Filter, SynthError> {
        Filter::bandpass(center_hz, self.sample_rate)
    }
}

/// Owns the output rate and the noise source hits are built from.
pub struct HitFactory {
    sample_rate: u32,
    rng: SmallRng,
}

impl HitFactory {
    pub fn new(sample_rate: u32) -> Self {
        Self::from_rng(sample_rate, SmallRng::from_entropy())
    }

    /// Factory with deterministic noise.
    pub fn with_seed(sample_rate: u32, seed: u64) -> Self {
        Self::from_rng(sample_rate, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(sample_rate: u32, rng: SmallRng) -> Self {
        Self { sample_rate, rng }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn build(&mut self, voice: VoiceId, at: DeviceTime) -> Result<Hit, SynthError> {
        let mut ctx = HitContext::new(self.sample_rate, &mut self.rng);
        build_hit(voice, at, &mut ctx)
    }
}

/// Build the hit for `voice` starting at device time `at`.
pub fn build_hit(voice: VoiceId, at: DeviceTime, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    if ctx.sample_rate == 0 {
        return Err(SynthError::ZeroSampleRate);
    }
    let at = at.as_secs();
    match voice {
        VoiceId::Kick => Ok(kick::build(at, ctx)),
        VoiceId::Snare => snare::build(at, ctx),
        VoiceId::Clap => clap::build(at, ctx),
        VoiceId::Tom => Ok(tom::build(at, ctx)),
        VoiceId::Rim => Ok(rim::build(at, ctx)),
        VoiceId::Perc => perc::build(at, ctx),
        VoiceId::ClosedHat => hats::closed(at, ctx),
        VoiceId::OpenHat => hats::open(at, ctx),
    }
}

#[derive(Debug)]
enum Source {
    Tone(Oscillator),
    Noise { buffer: NoiseBuffer, cursor: usize },
}

/// One generator → filters → envelope chain.
#[derive(Debug)]
struct Branch {
    source: Source,
    filters: ArrayVec<Filter, MAX_FILTERS>,
    envelope: DecayEnvelope,
}

impl Branch {
    fn tone(oscillator: Oscillator, envelope: DecayEnvelope) -> Self {
        Self {
            source: Source::Tone(oscillator),
            filters: ArrayVec::new(),
            envelope,
        }
    }

    fn noise(buffer: NoiseBuffer, envelope: DecayEnvelope) -> Self {
        Self {
            source: Source::Noise { buffer, cursor: 0 },
            filters: ArrayVec::new(),
            envelope,
        }
    }

    fn through(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    fn render(&mut self, t: f64, dt: f64) -> f32 {
        let raw = match &mut self.source {
            Source::Tone(osc) => osc.next(t, dt),
            Source::Noise { buffer, cursor } => {
                let s = buffer.get(*cursor);
                *cursor += 1;
                s
            }
        };
        let filtered = self.filters.iter_mut().fold(raw, |x, f| f.process(x));
        filtered * self.envelope.value_at(t)
    }
}

/// A single triggered drum sound.
#[derive(Debug)]
pub struct Hit {
    voice: VoiceId,
    sample_rate: u32,
    start_frame: u64,
    stop_frame: u64,
    branches: ArrayVec<Branch, MAX_BRANCHES>,
}

impl Hit {
    fn new(voice: VoiceId, start: f64, length: f64, sample_rate: u32) -> Self {
        Self {
            voice,
            sample_rate,
            start_frame: DeviceTime::from_secs(start).to_frame(sample_rate),
            stop_frame: DeviceTime::from_secs(start + length).to_frame(sample_rate),
            branches: ArrayVec::new(),
        }
    }

    fn with(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    pub fn start(&self) -> DeviceTime {
        DeviceTime::from_frames(self.start_frame, self.sample_rate)
    }

    /// Time at which the generators stop.
    pub fn stop(&self) -> DeviceTime {
        DeviceTime::from_frames(self.stop_frame, self.sample_rate)
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    /// Whether the hit produces output at `frame`.
    pub fn is_sounding(&self, frame: u64) -> bool {
        frame >= self.start_frame && frame < self.stop_frame
    }

    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.stop_frame
    }

    pub fn is_choked(&self) -> bool {
        self.branches.iter().any(|b| b.envelope.is_forced())
    }

    /// Envelope gain at `t` (largest over branches).
    pub fn gain_at(&self, t: DeviceTime) -> f32 {
        self.branches
            .iter()
            .map(|b| b.envelope.value_at(t.as_secs()))
            .fold(0.0, f32::max)
    }

    /// Force the hit to die away from `at`: ramp to the floor over
    /// `CHOKE_TAIL` and stop the generators `CHOKE_STOP` after `at`.
    pub fn choke(&mut self, at: DeviceTime) {
        let at_secs = at.as_secs();
        for branch in &mut self.branches {
            branch.envelope.force_decay(at_secs, crate::choke::CHOKE_TAIL);
        }
        let stop = at.add_secs(crate::choke::CHOKE_STOP).to_frame(self.sample_rate);
        self.stop_frame = self.stop_frame.min(stop);
    }

    /// Render the hit's output for `frame`; silent outside its lifetime.
    pub fn render(&mut self, frame: u64) -> f32 {
        if !self.is_sounding(frame) {
            return 0.0;
        }
        let t = DeviceTime::from_frames(frame, self.sample_rate).as_secs();
        let dt = 1.0 / self.sample_rate as f64;
        self.branches.iter_mut().map(|b| b.render(t, dt)).sum()
    }
}
