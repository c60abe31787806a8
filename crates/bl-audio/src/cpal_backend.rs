//! CPAL-based real-time backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bl_engine::{Engine, Hit, HitFactory, VoiceCommand, MAX_RETIRED};
use bl_ir::DeviceTime;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::{error, info, warn};

use crate::traits::{AudioBackend, AudioError};

/// Real-time output on the default device.
///
/// The render [`Engine`] lives inside the cpal callback, which never
/// allocates or frees. Voice commands are built into hits on the caller's
/// thread and reach the callback through a lock-free ring buffer; hits the
/// engine is done with come back through a second ring and are dropped
/// here. The callback publishes the device clock as a frame counter after
/// every buffer.
pub struct CpalBackend {
    /// Built on the first `resume`
    stream: Option<Stream>,
    /// Hit builder and queues; exist once the stream does
    link: Option<CallbackLink>,
    command_capacity: usize,
    frames: Arc<AtomicU64>,
    sample_rate: u32,
    master_gain: f32,
    running: bool,
}

/// The control-thread end of a running stream.
struct CallbackLink {
    factory: HitFactory,
    hits: HeapProd<Hit>,
    returns: HeapCons<Hit>,
}

impl CallbackLink {
    /// Drop hits the callback has finished with.
    fn collect(&mut self) {
        while self.returns.try_pop().is_some() {}
    }
}

impl CpalBackend {
    /// Create a backend. No device is opened until [`AudioBackend::resume`].
    pub fn new(command_capacity: usize, master_gain: f32) -> Self {
        Self {
            stream: None,
            link: None,
            command_capacity: command_capacity.max(1),
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: 0,
            master_gain,
            running: false,
        }
    }

    fn build_stream(&mut self) -> Result<(Stream, CallbackLink), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let default = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let mut config: StreamConfig = if default.sample_format() == SampleFormat::F32 {
            default.into()
        } else {
            let rate = default.sample_rate();
            let supported = device
                .supported_output_configs()
                .map_err(|e| AudioError::DeviceInit(e.to_string()))?
                .find(|c| {
                    c.sample_format() == SampleFormat::F32
                        && c.min_sample_rate() <= rate
                        && rate <= c.max_sample_rate()
                })
                .ok_or_else(|| AudioError::UnsupportedFormat(format!("{:?}", default.sample_format())))?;
            supported.with_sample_rate(rate).into()
        };
        // The engine renders stereo; extra device channels are zero-filled.
        config.channels = config.channels.max(2);

        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;
        let (hits, mut incoming) = HeapRb::<Hit>::new(self.command_capacity).split();
        let (mut outgoing, returns) = HeapRb::<Hit>::new(self.command_capacity + MAX_RETIRED).split();
        let mut engine = Engine::new(sample_rate);
        engine.set_master_gain(self.master_gain);
        let frames = Arc::clone(&self.frames);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    realtime(|| {
                        while let Some(hit) = incoming.try_pop() {
                            engine.insert(hit);
                        }
                        engine.render_interleaved(data, channels);
                        engine.recycle(|hit| outgoing.try_push(hit));
                        frames.store(engine.frames_rendered(), Ordering::Release);
                    })
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.sample_rate = sample_rate;
        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels,
            "audio stream created"
        );
        let link = CallbackLink {
            factory: HitFactory::new(sample_rate),
            hits,
            returns,
        };
        Ok((stream, link))
    }
}

/// Run the callback body, aborting on any heap activity when built with
/// `alloc_check`.
#[cfg(feature = "alloc_check")]
fn realtime<T>(body: impl FnOnce() -> T) -> T {
    assert_no_alloc::assert_no_alloc(body)
}

#[cfg(not(feature = "alloc_check"))]
fn realtime<T>(body: impl FnOnce() -> T) -> T {
    body()
}

impl AudioBackend for CpalBackend {
    fn resume(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            let (stream, link) = self.build_stream()?;
            self.stream = Some(stream);
            self.link = Some(link);
        }
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        self.running = true;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn current_time(&self) -> DeviceTime {
        DeviceTime::from_frames(self.frames.load(Ordering::Acquire), self.sample_rate)
    }

    fn send(&mut self, command: VoiceCommand) -> bool {
        let Some(link) = self.link.as_mut() else {
            warn!(voice = %command.voice, "audio stream not started, dropping hit");
            return false;
        };
        link.collect();
        let hit = match link.factory.build(command.voice, command.at) {
            Ok(hit) => hit,
            Err(err) => {
                warn!(voice = %command.voice, error = %err, "dropping hit");
                return false;
            }
        };
        if link.hits.try_push(hit).is_err() {
            warn!(voice = %command.voice, "hit queue full, dropping hit");
            return false;
        }
        true
    }
}
