//! Audio backend trait and error types.

use bl_engine::VoiceCommand;
use bl_ir::DeviceTime;

/// Error type for audio operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No audio device available
    #[error("no audio output device available")]
    NoDevice,
    /// Failed to initialize audio device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("playback error: {0}")]
    Playback(String),
    /// The device offers no stream format the engine can render
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// A device clock plus a place to send voice commands.
pub trait AudioBackend {
    /// Initialise the device on first use, or resume it if suspended.
    ///
    /// Blocking; must succeed before anything is scheduled.
    fn resume(&mut self) -> Result<(), AudioError>;

    fn is_running(&self) -> bool;

    /// Native sample rate; 0 before the first successful `resume`.
    fn sample_rate(&self) -> u32;

    /// Current device time.
    fn current_time(&self) -> DeviceTime;

    /// Queue a voice command without blocking.
    ///
    /// Returns `false` if the command was dropped.
    fn send(&mut self, command: VoiceCommand) -> bool;
}
