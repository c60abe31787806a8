//! Offline backend: renders on demand instead of on a device clock.

use bl_engine::{Engine, Frame, VoiceCommand};
use bl_ir::DeviceTime;

use crate::traits::{AudioBackend, AudioError};

/// Backend whose clock only moves when [`render`](Self::render) is called.
///
/// Used for WAV export and tests; commands go straight into the engine.
pub struct OfflineBackend {
    engine: Engine,
    running: bool,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self::from_engine(Engine::new(sample_rate))
    }

    /// Backend with deterministic noise, for reproducible renders.
    pub fn with_seed(sample_rate: u32, seed: u64) -> Self {
        Self::from_engine(Engine::with_seed(sample_rate, seed))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self { engine, running: false }
    }

    /// Render `count` frames, advancing the device clock.
    pub fn render(&mut self, count: usize) -> Vec<Frame> {
        self.engine.render_frames(count)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

impl AudioBackend for OfflineBackend {
    fn resume(&mut self) -> Result<(), AudioError> {
        if self.engine.sample_rate() == 0 {
            return Err(AudioError::DeviceInit("sample rate is zero".into()));
        }
        self.running = true;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    fn current_time(&self) -> DeviceTime {
        self.engine.current_time()
    }

    fn send(&mut self, command: VoiceCommand) -> bool {
        self.engine.handle(command);
        true
    }
}
