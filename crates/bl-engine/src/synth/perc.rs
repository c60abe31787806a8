//! Perc: a short band of noise around 1.2 kHz.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::error::SynthError;
use bl_ir::VoiceId;

const LENGTH: f64 = 0.12;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    let tick = Branch::noise(ctx.noise(LENGTH), DecayEnvelope::new(at, 0.4, 0.1))
        .through(ctx.bandpass(1200.0)?);
    Ok(Hit::new(VoiceId::Perc, at, LENGTH, ctx.sample_rate).with(tick))
}
