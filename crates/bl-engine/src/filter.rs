//! Biquad high-pass and band-pass filters.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};

use crate::error::SynthError;

/// Cutoffs are kept below this fraction of the sample rate.
const NYQUIST_MARGIN: f32 = 0.45;
const BANDPASS_Q: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    HighPass,
    BandPass,
}

/// A single biquad stage with fixed cutoff.
pub struct Filter {
    kind: FilterKind,
    cutoff_hz: f32,
    inner: DirectForm2Transposed<f32>,
}

impl Filter {
    /// Design a filter. Cutoffs at or above Nyquist are pulled just below it.
    pub fn new(kind: FilterKind, cutoff_hz: f32, sample_rate: u32) -> Result<Self, SynthError> {
        if sample_rate == 0 {
            return Err(SynthError::ZeroSampleRate);
        }
        let fs = sample_rate as f32;
        let cutoff = cutoff_hz.min(fs * NYQUIST_MARGIN);
        let (ty, q) = match kind {
            FilterKind::HighPass => (Type::HighPass, Q_BUTTERWORTH_F32),
            FilterKind::BandPass => (Type::BandPass, BANDPASS_Q),
        };
        let coeffs = Coefficients::<f32>::from_params(ty, fs.hz(), cutoff.hz(), q).map_err(|e| {
            SynthError::Filter {
                kind,
                cutoff_hz,
                sample_rate,
                reason: format!("{:?}", e),
            }
        })?;
        Ok(Self {
            kind,
            cutoff_hz: cutoff,
            inner: DirectForm2Transposed::<f32>::new(coeffs),
        })
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: u32) -> Result<Self, SynthError> {
        Self::new(FilterKind::HighPass, cutoff_hz, sample_rate)
    }

    pub fn bandpass(center_hz: f32, sample_rate: u32) -> Result<Self, SynthError> {
        Self::new(FilterKind::BandPass, center_hz, sample_rate)
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Effective cutoff after Nyquist limiting.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn process(&mut self, input: f32) -> f32 {
        self.inner.run(input)
    }
}

impl core::fmt::Debug for Filter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Filter")
            .field("kind", &self.kind)
            .field("cutoff_hz", &self.cutoff_hz)
            .finish()
    }
}
