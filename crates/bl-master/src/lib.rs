//! Headless transport controller for the beatlab drum machine.
//!
//! [`Transport`] ties the lookahead scheduler and the chain sequencer to an
//! audio backend. The host owns it, calls [`Transport::tick`] every
//! `tick_interval` with a fresh view of the project, and uses the rest of
//! the API for start/stop and pad hits. The same transport drives both the
//! real-time cpal backend and offline rendering.

mod config;
mod observer;
mod render;
mod wav;

use std::time::Duration;

use bl_audio::{AudioBackend, AudioError};
use bl_engine::{ChainSequencer, JumpError, LookaheadScheduler, VoiceCommand};
use tracing::{debug, info, warn};

// Re-export common types so callers don't need bl-engine/bl-audio directly.
pub use bl_audio::{CpalBackend, OfflineBackend};
pub use bl_engine::Frame;
pub use bl_ir::{PatternId, Project, VoiceId};

pub use config::{ConfigError, TransportConfig};
pub use observer::PatternObserver;
pub use render::{render_for, render_project};
pub use wav::{frames_to_wav, save_wav, write_wav};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("audio backend unavailable: {0}")]
    Backend(#[from] AudioError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("render length must be a finite number of seconds, got {0}")]
    Length(f64),
}

/// Playback controller: start/stop, the periodic tick, and manual triggers.
pub struct Transport<B: AudioBackend> {
    backend: B,
    config: TransportConfig,
    scheduler: LookaheadScheduler,
    sequencer: ChainSequencer,
    observer: Option<Box<dyn PatternObserver>>,
}

impl<B: AudioBackend> Transport<B> {
    pub fn new(backend: B, config: TransportConfig) -> Self {
        let scheduler = LookaheadScheduler::new(config.lookahead_secs(), config.start_lead_secs());
        Self {
            backend,
            config,
            scheduler,
            sequencer: ChainSequencer::new(),
            observer: None,
        }
    }

    /// Report live-pattern changes to `observer`.
    pub fn with_observer(mut self, observer: impl PatternObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn PatternObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// How often the host should call [`tick`](Self::tick).
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    // --- Transport ---

    /// Start playback at step 0. Starting while playing is a no-op.
    ///
    /// The backend is resumed first; if that fails playback stays stopped.
    pub fn start(&mut self, project: &Project) -> Result<(), TransportError> {
        if self.scheduler.is_running() {
            return Ok(());
        }
        if let Err(err) = self.backend.resume() {
            warn!(error = %err, "cannot start: audio backend unavailable");
            return Err(err.into());
        }

        let now = self.backend.current_time();
        self.scheduler.start(now);
        if let Some(id) = self.sequencer.on_start(project) {
            self.notify(id);
        }
        info!(bpm = project.tempo().bpm(), at = now.as_secs(), "transport started");
        Ok(())
    }

    /// Stop scheduling and drop the playback cursor. Hits already sent
    /// finish on their own.
    pub fn stop(&mut self) {
        if self.scheduler.stop() {
            self.sequencer.reset();
            info!("transport stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Next step to be scheduled, `0..16`; 0 while stopped.
    pub fn current_step(&self) -> usize {
        self.scheduler.current_step()
    }

    /// Pattern currently sounding, as far as the scheduler has got.
    pub fn live_pattern(&self, project: &Project) -> Option<PatternId> {
        self.sequencer.live_pattern(project)
    }

    /// The periodic check: schedule every step due within the lookahead
    /// window. Returns the number of steps scheduled.
    pub fn tick(&mut self, project: &Project) -> usize {
        if !self.scheduler.is_running() {
            return 0;
        }
        let tempo = project.tempo();
        let now = self.backend.current_time();
        let mut scheduled = 0;

        while let Some(due) = self.scheduler.poll(now, tempo) {
            let grid = self.sequencer.grid_for_step(due.step, project);
            for voice in grid.voices_at(due.step) {
                self.backend.send(VoiceCommand::new(voice, due.time));
            }
            debug!(step = due.step, time = due.time.as_secs(), "scheduled step");

            if due.wrapped {
                if let Some(id) = self.sequencer.on_boundary(project) {
                    self.notify(id);
                }
            }
            scheduled += 1;
        }
        scheduled
    }

    /// Fire one voice now (plus the manual lead), outside the sequence.
    pub fn trigger_voice(&mut self, voice: VoiceId) -> Result<(), TransportError> {
        self.backend.resume()?;
        let at = self.backend.current_time().add_secs(self.config.manual_lead_secs());
        self.backend.send(VoiceCommand::new(voice, at));
        Ok(())
    }

    /// Move chained playback to `id` immediately.
    pub fn jump_to_pattern(&mut self, id: PatternId, project: &Project) -> Result<(), JumpError> {
        if let Some(id) = self.sequencer.jump_to(id, project)? {
            self.notify(id);
        }
        Ok(())
    }

    fn notify(&mut self, id: PatternId) {
        debug!(?id, "live pattern changed");
        if let Some(observer) = self.observer.as_mut() {
            observer.live_pattern_changed(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_ir::{DeviceTime, Pattern};
    use ringbuf::traits::{Consumer, Split};
    use ringbuf::HeapRb;

    /// Backend with a hand-moved clock that records every command.
    #[derive(Default)]
    struct RecordingBackend {
        now: f64,
        running: bool,
        fail_resume: bool,
        sent: Vec<VoiceCommand>,
    }

    impl AudioBackend for RecordingBackend {
        fn resume(&mut self) -> Result<(), AudioError> {
            if self.fail_resume {
                return Err(AudioError::NoDevice);
            }
            self.running = true;
            Ok(())
        }

        fn is_running(&self) -> bool {
            self.running
        }

        fn sample_rate(&self) -> u32 {
            48000
        }

        fn current_time(&self) -> DeviceTime {
            DeviceTime::from_secs(self.now)
        }

        fn send(&mut self, command: VoiceCommand) -> bool {
            self.sent.push(command);
            true
        }
    }

    fn transport() -> Transport<RecordingBackend> {
        Transport::new(RecordingBackend::default(), TransportConfig::default())
    }

    fn kick_on_zero() -> Project {
        let mut project = Project::new();
        project.toggle_step(VoiceId::Kick, 0);
        project
    }

    #[test]
    fn start_failure_stays_stopped() {
        let backend = RecordingBackend {
            fail_resume: true,
            ..Default::default()
        };
        let mut t = Transport::new(backend, TransportConfig::default());
        let err = t.start(&Project::new()).unwrap_err();
        assert!(matches!(err, TransportError::Backend(AudioError::NoDevice)));
        assert!(!t.is_playing());
        assert_eq!(t.tick(&Project::new()), 0);
    }

    #[test]
    fn start_is_step_zero_and_idempotent() {
        let project = kick_on_zero();
        let mut t = transport();
        t.start(&project).unwrap();
        assert!(t.is_playing());
        assert_eq!(t.current_step(), 0);

        t.backend_mut().now = 0.3;
        t.tick(&project);
        let step = t.current_step();
        assert_ne!(step, 0);
        t.start(&project).unwrap();
        assert_eq!(t.current_step(), step);

        t.stop();
        t.stop();
        assert!(!t.is_playing());
        assert_eq!(t.current_step(), 0);
    }

    #[test]
    fn tick_sends_due_voices_at_step_times() {
        let mut project = kick_on_zero();
        project.toggle_step(VoiceId::ClosedHat, 2);
        let mut t = transport();
        t.start(&project).unwrap();

        // Window up to 0.4 s: steps 0..=2 at 0.05, 0.175, 0.3.
        t.backend_mut().now = 0.3;
        assert_eq!(t.tick(&project), 3);
        let sent = &t.backend().sent;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], VoiceCommand::new(VoiceId::Kick, DeviceTime::from_secs(0.05)));
        assert_eq!(sent[1].voice, VoiceId::ClosedHat);
        assert!((sent[1].at.as_secs() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn stopped_transport_schedules_nothing() {
        let project = kick_on_zero();
        let mut t = transport();
        t.start(&project).unwrap();
        t.stop();
        t.backend_mut().now = 5.0;
        assert_eq!(t.tick(&project), 0);
        assert!(t.backend().sent.is_empty());
    }

    #[test]
    fn manual_trigger_uses_lead() {
        let mut t = transport();
        t.backend_mut().now = 1.0;
        t.trigger_voice(VoiceId::Clap).unwrap();
        let sent = &t.backend().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].voice, VoiceId::Clap);
        assert!((sent[0].at.as_secs() - 1.01).abs() < 1e-12);
        assert!(!t.is_playing());
    }

    #[test]
    fn chain_changes_reach_observer() {
        let mut project = Project::new();
        let first = project.active_pattern_id().unwrap();
        let second = project.add_pattern(Pattern::new("B"));
        project.set_active(first);
        project.set_chain_enabled(true);

        let (prod, mut cons) = HeapRb::<PatternId>::new(4).split();
        let mut t = transport().with_observer(prod);
        t.start(&project).unwrap();
        assert!(cons.try_pop().is_none());

        // One full bar at 120 BPM is 2 s; step 0 of the next bar is due.
        t.backend_mut().now = 2.0;
        t.tick(&project);
        assert_eq!(cons.try_pop(), Some(second));
        assert_eq!(t.live_pattern(&project), Some(second));
    }

    #[test]
    fn restart_reports_chain_head_again() {
        let mut project = Project::new();
        let b = project.add_pattern(Pattern::new("B"));
        let c = project.add_pattern(Pattern::new("C"));
        let d = project.add_pattern(Pattern::new("D"));
        project.set_chain([b, c]);
        project.set_chain_enabled(true);
        assert_eq!(project.active_pattern_id(), Some(d));

        let (prod, mut cons) = HeapRb::<PatternId>::new(8).split();
        let mut t = transport().with_observer(prod);
        t.start(&project).unwrap();
        assert_eq!(cons.try_pop(), Some(b));

        t.backend_mut().now = 2.0;
        t.tick(&project);
        assert_eq!(cons.try_pop(), Some(c));
        t.stop();
        assert_eq!(t.live_pattern(&project), Some(d));

        t.start(&project).unwrap();
        assert_eq!(cons.try_pop(), Some(b));
        assert_eq!(t.live_pattern(&project), Some(b));
        assert!(cons.try_pop().is_none());
    }

    #[test]
    fn jump_outside_chain_is_refused() {
        let mut project = Project::new();
        let first = project.active_pattern_id().unwrap();
        let mut t = transport();
        t.start(&project).unwrap();
        assert_eq!(t.jump_to_pattern(first, &project), Err(JumpError::NotChained));

        project.set_chain_enabled(true);
        assert_eq!(t.jump_to_pattern(first, &project), Ok(()));
    }
}
