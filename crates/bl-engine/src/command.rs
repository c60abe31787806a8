//! Host-to-engine trigger commands.

use bl_ir::{DeviceTime, VoiceId};

/// "Start `voice` at device time `at`."
///
/// Both the scheduler and manual pad hits produce these; the engine turns each
/// one into a fresh hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceCommand {
    pub voice: VoiceId,
    pub at: DeviceTime,
}

impl VoiceCommand {
    pub const fn new(voice: VoiceId, at: DeviceTime) -> Self {
        Self { voice, at }
    }
}
