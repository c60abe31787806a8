//! Snare: high-passed noise for the wires plus a triangle body.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::error::SynthError;
use crate::oscillator::{FrequencySweep, Oscillator, Waveform};
use bl_ir::VoiceId;

const LENGTH: f64 = 0.2;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    let wires = Branch::noise(ctx.noise(LENGTH), DecayEnvelope::new(at, 0.7, 0.15))
        .through(ctx.highpass(1200.0)?);
    let body = Branch::tone(
        Oscillator::new(Waveform::Triangle, FrequencySweep::constant(180.0)),
        DecayEnvelope::new(at, 0.4, 0.1),
    );
    Ok(Hit::new(VoiceId::Snare, at, LENGTH, ctx.sample_rate)
        .with(wires)
        .with(body))
}
