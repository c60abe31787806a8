//! Clap: noise band-passed around 2 kHz, then high-passed.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::error::SynthError;
use bl_ir::VoiceId;

const LENGTH: f64 = 0.22;

pub(super) fn build(at: f64, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    let burst = Branch::noise(ctx.noise(LENGTH), DecayEnvelope::new(at, 0.8, 0.18))
        .through(ctx.bandpass(2000.0)?)
        .through(ctx.highpass(1200.0)?);
    Ok(Hit::new(VoiceId::Clap, at, LENGTH, ctx.sample_rate).with(burst))
}
