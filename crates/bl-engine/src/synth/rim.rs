//! Rim: a short 800 Hz square click.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::oscillator::{FrequencySweep, Oscillator, Waveform};
use bl_ir::VoiceId;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Hit {
    let click = Branch::tone(
        Oscillator::new(Waveform::Square, FrequencySweep::constant(800.0)),
        DecayEnvelope::new(at, 0.5, 0.05),
    );
    Hit::new(VoiceId::Rim, at, 0.07, ctx.sample_rate).with(click)
}
