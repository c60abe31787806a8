//! White-noise buffers.

use rand::Rng;

/// Independent uniform samples in `[-1, 1)`, generated fresh for each hit.
#[derive(Clone, Debug, Default)]
pub struct NoiseBuffer {
    samples: Vec<f32>,
}

impl NoiseBuffer {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let samples = (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        Self { samples }
    }

    /// Enough samples to cover `seconds` at `sample_rate`.
    pub fn for_duration<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32, seconds: f64) -> Self {
        let len = (seconds.max(0.0) * sample_rate as f64).ceil() as usize + 1;
        Self::generate(rng, len)
    }

    /// Sample at `index`; silence past the end.
    pub fn get(&self, index: usize) -> f32 {
        self.samples.get(index).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
