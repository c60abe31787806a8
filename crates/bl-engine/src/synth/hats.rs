//! Closed and open hi-hats.
//!
//! Both are band-passed then high-passed noise; the open hat rings longer.
//! Choking between them is handled by the engine's [`ChokeSlot`](crate::ChokeSlot),
//! not here.

use super::{Branch, Hit, HitContext};
use crate::envelope::DecayEnvelope;
use crate::error::SynthError;
use bl_ir::VoiceId;

const CLOSED_LENGTH: f64 = 0.06;
const OPEN_LENGTH: f64 = 0.25;

pub(super) fn closed(at: f64, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    let sizzle = Branch::noise(ctx.noise(CLOSED_LENGTH), DecayEnvelope::new(at, 0.3, 0.05))
        .through(ctx.bandpass(9000.0)?)
        .through(ctx.highpass(7000.0)?);
    Ok(Hit::new(VoiceId::ClosedHat, at, CLOSED_LENGTH, ctx.sample_rate).with(sizzle))
}

pub(super) fn open(at: f64, ctx: &mut HitContext) -> Result<Hit, SynthError> {
    let wash = Branch::noise(ctx.noise(OPEN_LENGTH), DecayEnvelope::new(at, 0.25, 0.22))
        .through(ctx.bandpass(8500.0)?)
        .through(ctx.highpass(6000.0)?);
    Ok(Hit::new(VoiceId::OpenHat, at, OPEN_LENGTH, ctx.sample_rate).with(wash))
}
