//! Offline rendering through the real-time transport path.

use bl_audio::OfflineBackend;
use bl_engine::Frame;
use bl_ir::Project;

use crate::config::TransportConfig;
use crate::{Transport, TransportError};

/// Render `seconds` of `project` from a fresh start.
///
/// The transport is ticked once per `tick_interval`, with one tick's worth of
/// frames rendered in between, exactly as the real-time host loop would.
pub fn render_project(
    project: &Project,
    config: &TransportConfig,
    sample_rate: u32,
    seconds: f64,
) -> Result<Vec<Frame>, TransportError> {
    config.validate()?;
    if !seconds.is_finite() {
        return Err(TransportError::Length(seconds));
    }
    let mut backend = OfflineBackend::new(sample_rate);
    backend.engine_mut().set_master_gain(config.master_gain);
    let mut transport = Transport::new(backend, config.clone());
    transport.start(project)?;

    let total = (seconds.max(0.0) * sample_rate as f64).round() as usize;
    Ok(render_for(&mut transport, project, total))
}

/// Tick and render `frames` frames on an already started transport.
pub fn render_for(transport: &mut Transport<OfflineBackend>, project: &Project, frames: usize) -> Vec<Frame> {
    let sample_rate = transport.backend().engine().sample_rate();
    let chunk = transport.config().tick_frames(sample_rate);
    let mut out = Vec::with_capacity(frames);
    while out.len() < frames {
        transport.tick(project);
        let n = chunk.min(frames - out.len());
        out.extend(transport.backend_mut().render(n));
    }
    out
}
