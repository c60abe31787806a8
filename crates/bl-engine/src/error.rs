//! Synthesis error type.

use crate::filter::FilterKind;

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The biquad designer rejected the filter parameters.
    #[error("cannot design {kind:?} filter at {cutoff_hz} Hz for {sample_rate} Hz output: {reason}")]
    Filter {
        kind: FilterKind,
        cutoff_hz: f32,
        sample_rate: u32,
        reason: String,
    },
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
}
