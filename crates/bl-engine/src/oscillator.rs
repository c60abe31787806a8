//! Periodic oscillators with exponential pitch sweeps.

use core::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    /// Value at `phase` (in cycles, `0.0..1.0`).
    fn sample(self, phase: f64) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin() as f32,
            Waveform::Triangle => {
                let v = if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                };
                v as f32
            }
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Frequency that moves exponentially from `from_hz` at `t0` to `to_hz` at `t1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencySweep {
    from_hz: f64,
    to_hz: f64,
    t0: f64,
    t1: f64,
}

impl FrequencySweep {
    pub fn constant(hz: f64) -> Self {
        Self { from_hz: hz, to_hz: hz, t0: 0.0, t1: 0.0 }
    }

    pub fn exponential(from_hz: f64, to_hz: f64, t0: f64, t1: f64) -> Self {
        Self { from_hz, to_hz, t0, t1 }
    }

    pub fn hz_at(&self, t: f64) -> f64 {
        if t <= self.t0 || self.from_hz == self.to_hz {
            return self.from_hz;
        }
        if t >= self.t1 {
            return self.to_hz;
        }
        let progress = (t - self.t0) / (self.t1 - self.t0);
        self.from_hz * (self.to_hz / self.from_hz).powf(progress)
    }
}

#[derive(Clone, Debug)]
pub struct Oscillator {
    waveform: Waveform,
    sweep: FrequencySweep,
    /// Phase in cycles.
    phase: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sweep: FrequencySweep) -> Self {
        Self { waveform, sweep, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency_at(&self, t: f64) -> f64 {
        self.sweep.hz_at(t)
    }

    /// Output at time `t`, then advance the phase by one frame of length `dt`.
    pub fn next(&mut self, t: f64, dt: f64) -> f32 {
        let out = self.waveform.sample(self.phase);
        self.phase += self.sweep.hz_at(t) * dt;
        self.phase -= self.phase.floor();
        out
    }
}
