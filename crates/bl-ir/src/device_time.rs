//! Audio-device time.

/// An absolute position on the audio device clock, in seconds.
///
/// Device time starts at zero when the backend is first initialised and
/// advances with every rendered frame; it is the only clock hits and steps
/// are scheduled against.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct DeviceTime(f64);

impl DeviceTime {
    pub const ZERO: DeviceTime = DeviceTime(0.0);

    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Device time at the start of frame `frame`.
    pub fn from_frames(frame: u64, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Self::ZERO;
        }
        Self(frame as f64 / sample_rate as f64)
    }

    pub const fn as_secs(self) -> f64 {
        self.0
    }

    pub fn add_secs(self, secs: f64) -> Self {
        Self(self.0 + secs)
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn since(self, earlier: DeviceTime) -> f64 {
        self.0 - earlier.0
    }

    /// Nearest frame index at `sample_rate`; times before zero map to frame 0.
    pub fn to_frame(self, sample_rate: u32) -> u64 {
        let frame = libm::round(self.0 * sample_rate as f64);
        if frame <= 0.0 {
            0
        } else {
            frame as u64
        }
    }
}
