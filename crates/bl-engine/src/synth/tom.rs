//! Tom: like the kick, but higher and longer.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::oscillator::{FrequencySweep, Oscillator, Waveform};
use bl_ir::VoiceId;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Hit {
    let sweep = FrequencySweep::exponential(180.0, 90.0, at, at + 0.2);
    let body = Branch::tone(
        Oscillator::new(Waveform::Sine, sweep),
        DecayEnvelope::new(at, 0.7, 0.22),
    );
    Hit::new(VoiceId::Tom, at, 0.25, ctx.sample_rate).with(body)
}
