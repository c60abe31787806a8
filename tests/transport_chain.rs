//! Integration test: chained playback through the transport, offline.

use bl_audio::OfflineBackend;
use bl_engine::Frame;
use bl_ir::{Pattern, PatternId, Project, StepGrid, VoiceId};
use bl_master::{render_for, Transport, TransportConfig};
use ringbuf::traits::{Consumer, Split};
use ringbuf::{HeapCons, HeapRb};

const SAMPLE_RATE: u32 = 48000;
const BAR_FRAMES: usize = 2 * SAMPLE_RATE as usize;

fn kick_at(step: usize) -> StepGrid {
    let mut grid = StepGrid::silent();
    grid.set(VoiceId::Kick, step, true);
    grid
}

/// Chain [A, B, C] with the kick on step 0, 4 and 8 respectively; A active.
fn chained_project() -> (Project, [PatternId; 3]) {
    let mut project = Project::empty();
    let a = project.add_pattern(Pattern::with_grid("A", kick_at(0)));
    let b = project.add_pattern(Pattern::with_grid("B", kick_at(4)));
    let c = project.add_pattern(Pattern::with_grid("C", kick_at(8)));
    project.set_active(a);
    project.set_chain_enabled(true);
    (project, [a, b, c])
}

fn transport() -> (Transport<OfflineBackend>, HeapCons<PatternId>) {
    let (prod, cons) = HeapRb::<PatternId>::new(16).split();
    let backend = OfflineBackend::with_seed(SAMPLE_RATE, 11);
    (Transport::new(backend, TransportConfig::default()).with_observer(prod), cons)
}

/// Step (0..16) of the first kick inside each bar, bars starting at 0.05 s.
fn kick_steps(frames: &[Frame], bars: usize) -> Vec<Option<usize>> {
    let lead = (0.05 * SAMPLE_RATE as f64) as usize;
    let step_frames = BAR_FRAMES / 16;
    (0..bars)
        .map(|bar| {
            let start = lead + bar * BAR_FRAMES;
            let end = (start + BAR_FRAMES).min(frames.len());
            frames[start..end]
                .iter()
                .position(|f| !f.is_silent())
                .map(|offset| offset / step_frames)
        })
        .collect()
}

fn drain(cons: &mut HeapCons<PatternId>) -> Vec<PatternId> {
    std::iter::from_fn(|| cons.try_pop()).collect()
}

#[test]
fn chain_plays_each_pattern_for_one_bar() {
    let (project, [_, b, c]) = chained_project();
    let (mut t, mut changes) = transport();
    t.start(&project).unwrap();

    // Stop half way into the fourth bar, before its boundary is scheduled.
    let frames = render_for(&mut t, &project, 3 * BAR_FRAMES + SAMPLE_RATE as usize / 2);
    assert_eq!(kick_steps(&frames, 4), vec![Some(0), Some(4), Some(8), Some(0)]);
    // A is the edited pattern, so returning to it is not reported.
    assert_eq!(drain(&mut changes), vec![b, c]);
}

#[test]
fn unchained_plays_active_only() {
    let (mut project, [_, b, _]) = chained_project();
    project.set_chain_enabled(false);
    project.set_active(b);
    let (mut t, mut changes) = transport();
    t.start(&project).unwrap();

    let frames = render_for(&mut t, &project, 3 * BAR_FRAMES);
    assert_eq!(kick_steps(&frames, 3), vec![Some(4), Some(4), Some(4)]);
    assert!(drain(&mut changes).is_empty());
}

#[test]
fn empty_chain_behaves_as_disabled() {
    let (mut project, [_, _, c]) = chained_project();
    project.set_chain(Vec::<PatternId>::new());
    project.set_active(c);
    let (mut t, _changes) = transport();
    t.start(&project).unwrap();

    let frames = render_for(&mut t, &project, 2 * BAR_FRAMES);
    assert_eq!(kick_steps(&frames, 2), vec![Some(8), Some(8)]);
}

#[test]
fn selecting_for_edit_does_not_preempt_chain() {
    let (mut project, [_, _, c]) = chained_project();
    let (mut t, _changes) = transport();
    t.start(&project).unwrap();

    let mut frames = render_for(&mut t, &project, SAMPLE_RATE as usize / 2);
    project.set_active(c);
    frames.extend(render_for(&mut t, &project, 3 * BAR_FRAMES));
    assert_eq!(kick_steps(&frames, 3), vec![Some(0), Some(4), Some(8)]);
}

#[test]
fn jump_switches_immediately() {
    let (project, [_, _, c]) = chained_project();
    let (mut t, mut changes) = transport();
    t.start(&project).unwrap();

    // Half a bar of A (no kick there after step 0), then jump to C.
    let mut frames = render_for(&mut t, &project, SAMPLE_RATE as usize / 2);
    t.jump_to_pattern(c, &project).unwrap();
    assert_eq!(t.live_pattern(&project), Some(c));
    assert_eq!(drain(&mut changes), vec![c]);

    frames.extend(render_for(&mut t, &project, 2 * BAR_FRAMES));
    // C's kick on step 8 lands in the first bar; the chain then wraps to A.
    assert_eq!(kick_steps(&frames, 2), vec![Some(0), Some(0)]);
    let bar0 = &frames[..BAR_FRAMES];
    let kicks = bar0.iter().filter(|f| !f.is_silent()).count();
    assert!(kicks > 2 * (0.15 * SAMPLE_RATE as f64) as usize, "expected two kicks in bar 0");
}

#[test]
fn restart_begins_at_step_zero_of_active_member() {
    let (project, [a, b, _]) = chained_project();
    let (mut t, _changes) = transport();
    t.start(&project).unwrap();
    render_for(&mut t, &project, BAR_FRAMES + SAMPLE_RATE as usize / 2);
    assert_eq!(t.live_pattern(&project), Some(b));

    t.stop();
    assert_eq!(t.current_step(), 0);
    t.start(&project).unwrap();
    assert_eq!(t.current_step(), 0);
    assert_eq!(t.live_pattern(&project), Some(a));
}

#[test]
fn every_start_reports_chain_head_when_active_is_outside_chain() {
    let (mut project, [_, b, c]) = chained_project();
    let d = project.add_pattern(Pattern::with_grid("D", kick_at(12)));
    project.set_chain([b, c]);
    project.set_active(d);
    let (mut t, mut changes) = transport();

    t.start(&project).unwrap();
    let first = render_for(&mut t, &project, SAMPLE_RATE as usize);
    t.stop();
    t.start(&project).unwrap();
    let second = render_for(&mut t, &project, SAMPLE_RATE as usize);

    assert_eq!(drain(&mut changes), vec![b, b]);
    assert_eq!(kick_steps(&first, 1), vec![Some(4)]);
    assert_eq!(kick_steps(&second, 1), vec![Some(4)]);
}
