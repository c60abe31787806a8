//! beatlab CLI: real-time playback, pad hits and WAV export.
//!
//! Usage:
//!   beatlab --step kick=x...x...x...x... --step hatClosed=x.
//!   beatlab --chain "kick=x...,snare=....x..." --chain "kick=x.x." --wav out.wav
//!   beatlab --trigger clap

mod pattern_arg;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bl_ir::{Pattern, PatternId, Project, StepGrid, VoiceId, DEFAULT_BPM};
use bl_master::{render_project, save_wav, CpalBackend, Transport, TransportConfig};
use clap::Parser;
use ringbuf::traits::{Consumer, Split};
use ringbuf::HeapRb;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pattern_arg::{PatternArg, RowArg};

/// Time left for the last hits to ring out before the stream is dropped.
const TAIL: Duration = Duration::from_millis(300);

#[derive(Parser, Debug)]
#[command(name = "beatlab", version, about = "Step-sequenced procedural drum machine")]
struct Cli {
    /// A row of the first pattern, e.g. `kick=x...x...x...x...`
    #[arg(long = "step", value_name = "VOICE=CELLS")]
    steps: Vec<RowArg>,

    /// Append a pattern (comma-separated rows) to the chain and enable chaining
    #[arg(long = "chain", value_name = "ROWS")]
    chain: Vec<PatternArg>,

    /// Tempo in BPM
    #[arg(long, default_value_t = DEFAULT_BPM)]
    tempo: f64,

    /// Render offline to this WAV file instead of playing
    #[arg(long, value_name = "PATH")]
    wav: Option<PathBuf>,

    /// How long to play or render
    #[arg(long, default_value_t = 8.0, value_parser = parse_seconds)]
    seconds: f64,

    /// Sample rate for offline rendering
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Transport configuration (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fire a single voice and exit
    #[arg(long, value_name = "VOICE")]
    trigger: Option<VoiceId>,
}

/// A finite, non-negative number of seconds.
fn parse_seconds(s: &str) -> Result<f64, String> {
    let seconds: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("`{s}` is not a finite, non-negative duration"));
    }
    Ok(seconds)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TransportConfig::load(path)?,
        None => TransportConfig::default(),
    };

    if let Some(voice) = cli.trigger {
        return trigger(voice, &config);
    }

    let project = build_project(&cli)?;
    match &cli.wav {
        Some(path) => render_to_wav(&project, &config, &cli, path),
        None => play(&project, &config, cli.seconds),
    }
}

/// First pattern from `--step` rows (or a demo groove), then one pattern per
/// `--chain` argument.
fn build_project(cli: &Cli) -> Result<Project> {
    let mut project = Project::new();
    project
        .set_tempo(cli.tempo)
        .with_context(|| format!("invalid tempo {}", cli.tempo))?;

    let first = project.active_pattern_id().context("new project has no pattern")?;
    let grid = if cli.steps.is_empty() && cli.chain.is_empty() {
        demo_groove()
    } else {
        let mut grid = StepGrid::silent();
        for row in &cli.steps {
            row.apply(&mut grid);
        }
        grid
    };
    if let Some(pattern) = project.pattern_mut(first) {
        pattern.grid = grid;
    }

    for (i, arg) in cli.chain.iter().enumerate() {
        let name = format!("Pattern {}", i + 2);
        project.add_pattern(Pattern::with_grid(&name, arg.grid()));
    }
    if !cli.chain.is_empty() {
        project.set_chain_enabled(true);
        project.set_active(first);
    }
    Ok(project)
}

fn demo_groove() -> StepGrid {
    let mut grid = StepGrid::silent();
    for step in [0, 4, 8, 12] {
        grid.set(VoiceId::Kick, step, true);
    }
    for step in [4, 12] {
        grid.set(VoiceId::Snare, step, true);
    }
    for step in (0..16).step_by(2) {
        grid.set(VoiceId::ClosedHat, step, true);
    }
    grid.set(VoiceId::ClosedHat, 14, false);
    grid.set(VoiceId::OpenHat, 14, true);
    grid
}

fn trigger(voice: VoiceId, config: &TransportConfig) -> Result<()> {
    let backend = CpalBackend::new(config.command_capacity, config.master_gain);
    let mut transport = Transport::new(backend, config.clone());
    transport.trigger_voice(voice)?;
    println!("{}", voice.label());
    std::thread::sleep(TAIL);
    Ok(())
}

fn render_to_wav(project: &Project, config: &TransportConfig, cli: &Cli, path: &Path) -> Result<()> {
    println!("Rendering {:.1}s to {} at {} Hz...", cli.seconds, path.display(), cli.sample_rate);
    let frames = render_project(project, config, cli.sample_rate, cli.seconds)?;
    save_wav(path, &frames, cli.sample_rate).with_context(|| format!("failed to write {}", path.display()))?;
    info!(frames = frames.len(), path = %path.display(), "wav written");
    println!("Done.");
    Ok(())
}

fn play(project: &Project, config: &TransportConfig, seconds: f64) -> Result<()> {
    let (producer, mut changes) = HeapRb::<PatternId>::new(config.observer_capacity).split();
    let backend = CpalBackend::new(config.command_capacity, config.master_gain);
    let mut transport = Transport::new(backend, config.clone()).with_observer(producer);

    transport.start(project)?;
    println!("Playing at {} BPM...", project.tempo().bpm());

    let started = Instant::now();
    let length = Duration::from_secs_f64(seconds);
    while started.elapsed() < length {
        transport.tick(project);
        while let Some(id) = changes.try_pop() {
            if let Some(pattern) = project.pattern(id) {
                println!("\r-> {}          ", pattern.name);
            }
        }
        print!("\rStep: {:02}", transport.current_step());
        let _ = std::io::stdout().flush();
        std::thread::sleep(transport.tick_interval());
    }

    transport.stop();
    std::thread::sleep(TAIL);
    println!("\rDone.          ");
    Ok(())
}
