//! Allocation-free render path tests.
//!
//! The real-time callback only inserts prebuilt hits, renders, and hands
//! finished hits back out. These tests run that body for several seconds of
//! a busy groove, with hits built on the control side between buffers, and
//! abort on any heap allocation or free inside it.
//!
//! Just run `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use bl_engine::{Engine, Hit, HitFactory, LookaheadScheduler, MAX_HITS, MAX_RETIRED};
use bl_ir::{DeviceTime, StepGrid, Tempo, VoiceId, STEPS};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;

const SAMPLE_RATE: u32 = 44100;
const BUFFER_FRAMES: usize = 512;

fn busy_groove() -> StepGrid {
    let mut grid = StepGrid::silent();
    for step in 0..STEPS {
        grid.set(VoiceId::ClosedHat, step, step % 4 != 2);
        grid.set(VoiceId::Perc, step, step % 3 == 0);
    }
    for step in [0, 3, 8, 11] {
        grid.set(VoiceId::Kick, step, true);
    }
    for step in [4, 12] {
        grid.set(VoiceId::Snare, step, true);
        grid.set(VoiceId::Clap, step, true);
    }
    for step in [2, 6, 10, 14] {
        grid.set(VoiceId::OpenHat, step, true);
    }
    grid.set(VoiceId::Tom, 15, true);
    grid.set(VoiceId::Rim, 7, true);
    grid
}

/// Play `grid` for `seconds`, building hits between buffers and rendering
/// each buffer inside `assert_no_alloc`.
fn assert_groove_alloc_free(grid: &StepGrid, bpm: f64, seconds: f64) {
    let tempo = Tempo::new(bpm).unwrap();
    let mut factory = HitFactory::with_seed(SAMPLE_RATE, 11);
    let mut engine = Engine::with_seed(SAMPLE_RATE, 11);
    let (mut hits_in, mut incoming) = HeapRb::<Hit>::new(256).split();
    let (mut outgoing, mut returns) = HeapRb::<Hit>::new(256 + MAX_RETIRED).split();
    let mut scheduler = LookaheadScheduler::new(0.1, 0.05);
    scheduler.start(engine.current_time());

    let mut out = vec![0.0f32; BUFFER_FRAMES * 2];
    let buffers = (seconds * SAMPLE_RATE as f64) as usize / BUFFER_FRAMES;
    let mut sent = 0;
    let mut recycled = 0;

    for _ in 0..buffers {
        while returns.try_pop().is_some() {}
        while let Some(due) = scheduler.poll(engine.current_time(), tempo) {
            for voice in grid.voices_at(due.step) {
                let hit = factory.build(voice, due.time).unwrap();
                assert!(hits_in.try_push(hit).is_ok());
                sent += 1;
            }
        }

        assert_no_alloc(|| {
            while let Some(hit) = incoming.try_pop() {
                engine.insert(hit);
            }
            engine.render_interleaved(&mut out, 2);
            recycled += engine.recycle(|hit| outgoing.try_push(hit));
        });
    }

    assert!(sent > 0);
    assert!(recycled > 0);
    assert!(out.iter().all(|s| s.is_finite()));
}

#[test]
fn busy_groove_renders_alloc_free() {
    assert_groove_alloc_free(&busy_groove(), 120.0, 5.0);
}

#[test]
fn fast_tempo_with_chokes_renders_alloc_free() {
    assert_groove_alloc_free(&busy_groove(), 300.0, 5.0);
}

#[test]
fn stealing_from_full_pool_is_alloc_free() {
    let mut factory = HitFactory::with_seed(SAMPLE_RATE, 3);
    let mut engine = Engine::with_seed(SAMPLE_RATE, 3);
    let (mut hits_in, mut incoming) = HeapRb::<Hit>::new(MAX_HITS + 16).split();
    for i in 0..MAX_HITS + 16 {
        let at = DeviceTime::from_frames(i as u64, SAMPLE_RATE);
        assert!(hits_in.try_push(factory.build(VoiceId::Rim, at).unwrap()).is_ok());
    }

    let mut out = vec![0.0f32; BUFFER_FRAMES * 2];
    assert_no_alloc(|| {
        while let Some(hit) = incoming.try_pop() {
            engine.insert(hit);
        }
        engine.render_interleaved(&mut out, 2);
    });

    assert_eq!(engine.active_hits(), MAX_HITS);
    assert_eq!(engine.retired_hits(), 16);
    assert_eq!(engine.recycle(|_| Ok(())), 16);
}
