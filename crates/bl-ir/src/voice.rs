//! The eight fixed percussion voices.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// Number of voice rows in every step grid.
pub const NUM_VOICES: usize = 8;

/// One of the eight procedural drum voices, in grid row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoiceId {
    Kick,
    Snare,
    Clap,
    Tom,
    Rim,
    Perc,
    ClosedHat,
    OpenHat,
}

impl VoiceId {
    /// All voices in grid row order.
    pub const ALL: [VoiceId; NUM_VOICES] = [
        VoiceId::Kick,
        VoiceId::Snare,
        VoiceId::Clap,
        VoiceId::Tom,
        VoiceId::Rim,
        VoiceId::Perc,
        VoiceId::ClosedHat,
        VoiceId::OpenHat,
    ];

    /// Grid row of this voice.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable identifier, as used in project documents and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            VoiceId::Kick => "kick",
            VoiceId::Snare => "snare",
            VoiceId::Clap => "clap",
            VoiceId::Tom => "tom",
            VoiceId::Rim => "rim",
            VoiceId::Perc => "perc",
            VoiceId::ClosedHat => "hatClosed",
            VoiceId::OpenHat => "hatOpen",
        }
    }

    /// Short display label for pads and grid rows.
    pub const fn label(self) -> &'static str {
        match self {
            VoiceId::Kick => "Kick",
            VoiceId::Snare => "Snare",
            VoiceId::Clap => "Clap",
            VoiceId::Tom => "Tom",
            VoiceId::Rim => "Rim",
            VoiceId::Perc => "Perc",
            VoiceId::ClosedHat => "Hat C",
            VoiceId::OpenHat => "Hat O",
        }
    }

    /// Hi-hat voices take part in open-hat choking.
    pub const fn is_hat(self) -> bool {
        matches!(self, VoiceId::ClosedHat | VoiceId::OpenHat)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A voice name that does not match any of the eight voices.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice `{0}`")]
pub struct UnknownVoice(pub String);

impl FromStr for VoiceId {
    type Err = UnknownVoice;

    /// Accepts the stable name (case-insensitive) or a common shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(voice) = VoiceId::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(s))
        {
            return Ok(voice);
        }
        let alias = |name: &str| s.eq_ignore_ascii_case(name);
        if alias("ch") || alias("closed-hat") || alias("closedhat") {
            Ok(VoiceId::ClosedHat)
        } else if alias("oh") || alias("open-hat") || alias("openhat") {
            Ok(VoiceId::OpenHat)
        } else if alias("bd") {
            Ok(VoiceId::Kick)
        } else if alias("sd") {
            Ok(VoiceId::Snare)
        } else {
            Err(UnknownVoice(s.to_string()))
        }
    }
}
