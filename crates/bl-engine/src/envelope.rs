//! Exponential decay envelopes.
//!
//! Envelopes are evaluated against absolute device time, so a hit scheduled
//! ahead of time and a hit rendered late both see the same curve.

/// Level every decay ramps toward. Exponential ramps cannot reach zero.
pub const ENVELOPE_FLOOR: f32 = 0.001;

/// An exponential ramp from `from` at `t0` to `to` at `t1`, holding `to` after.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ExpRamp {
    t0: f64,
    t1: f64,
    from: f32,
    to: f32,
}

impl ExpRamp {
    fn value_at(&self, t: f64) -> f32 {
        if t <= self.t0 {
            return self.from;
        }
        if t >= self.t1 || self.t1 <= self.t0 {
            return self.to;
        }
        let progress = ((t - self.t0) / (self.t1 - self.t0)) as f32;
        self.from * (self.to / self.from).powf(progress)
    }
}

/// Peak-then-exponential-decay gain curve, with an optional forced early decay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayEnvelope {
    decay: ExpRamp,
    /// Replaces `decay` from its own start time onward.
    forced: Option<ExpRamp>,
}

impl DecayEnvelope {
    /// Jump to `peak` at `start`, then decay to the floor over `decay` seconds.
    pub fn new(start: f64, peak: f32, decay: f64) -> Self {
        let peak = peak.max(ENVELOPE_FLOOR);
        Self {
            decay: ExpRamp {
                t0: start,
                t1: start + decay,
                from: peak,
                to: ENVELOPE_FLOOR,
            },
            forced: None,
        }
    }

    pub fn start(&self) -> f64 {
        self.decay.t0
    }

    pub fn peak(&self) -> f32 {
        self.decay.from
    }

    /// Gain at absolute time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        match self.forced {
            Some(ref forced) if t >= forced.t0 => forced.value_at(t),
            _ => self.decay.value_at(t),
        }
    }

    /// Time at which the envelope reaches the floor.
    pub fn end(&self) -> f64 {
        self.forced.map_or(self.decay.t1, |f| f.t1)
    }

    /// Abandon the natural decay at `at` and ramp from the current level to
    /// the floor over `tail` seconds.
    pub fn force_decay(&mut self, at: f64, tail: f64) {
        let from = self.value_at(at).max(ENVELOPE_FLOOR);
        self.forced = Some(ExpRamp {
            t0: at,
            t1: at + tail,
            from,
            to: ENVELOPE_FLOOR,
        });
    }

    pub fn is_forced(&self) -> bool {
        self.forced.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn decays_from_peak_to_floor() {
        let env = DecayEnvelope::new(1.0, 1.0, 0.2);
        assert_eq!(env.value_at(1.0), 1.0);
        assert!(close(env.value_at(1.1), 0.001f32.sqrt()), "halfway is the geometric mean");
        assert_eq!(env.value_at(1.2), ENVELOPE_FLOOR);
        assert_eq!(env.value_at(5.0), ENVELOPE_FLOOR);
        assert_eq!(env.end(), 1.2);
    }

    #[test]
    fn decay_is_monotonic_without_cutoff() {
        let env = DecayEnvelope::new(0.0, 0.7, 0.15);
        let mut last = f32::MAX;
        for i in 0..=150 {
            let v = env.value_at(i as f64 * 0.001);
            assert!(v <= last, "envelope rose at {} ms", i);
            assert!(v >= ENVELOPE_FLOOR);
            last = v;
        }
    }

    #[test]
    fn forced_decay_starts_from_current_level() {
        let mut env = DecayEnvelope::new(0.0, 0.25, 0.22);
        let before = env.value_at(0.05);
        env.force_decay(0.05, 0.03);

        assert!(env.is_forced());
        assert!(close(env.value_at(0.05), before));
        assert_eq!(env.value_at(0.081), ENVELOPE_FLOOR);
        assert!(env.value_at(0.07) < before);
        assert!((env.end() - 0.08).abs() < 1e-12);
        // Earlier times still follow the natural curve.
        assert_eq!(env.value_at(0.0), 0.25);
    }
}
