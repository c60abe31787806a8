//! Kick: a sine dropping from 120 Hz to 45 Hz.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::oscillator::{FrequencySweep, Oscillator, Waveform};
use bl_ir::VoiceId;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Hit {
    let sweep = FrequencySweep::exponential(120.0, 45.0, at, at + 0.15);
    let body = Branch::tone(
        Oscillator::new(Waveform::Sine, sweep),
        DecayEnvelope::new(at, 1.0, 0.2),
    );
    Hit::new(VoiceId::Kick, at, 0.21, ctx.sample_rate).with(body)
}
