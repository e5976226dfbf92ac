use std::{collections::HashMap, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vvstage::{
    Fps, FrameIndex, LoadedStage, PresentationConfig, Project, SpeedScaleMode, StageMode,
};

#[derive(Parser, Debug)]
#[command(name = "vvstage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the talk timeline of a project.
    Timeline(TimelineArgs),
    /// Print merged mouth-active intervals per speaker.
    Intervals(StageArgs),
    /// Print the evaluated stage state of one frame.
    Frame(FrameArgs),
    /// Print the output length of a stage.
    Metadata(StageArgs),
    /// Print the compositions defined by a config list.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Input `.vvproj` file.
    #[arg(long)]
    project: PathBuf,

    /// Which parts of an utterance the speed scale compresses.
    #[arg(long, value_enum, default_value_t = ModeChoice::All)]
    mode: ModeChoice,
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Subtitle config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Layers to evaluate.
    #[arg(long, value_enum, default_value_t = StageChoice::All)]
    stage_mode: StageChoice,

    /// Character key for `--stage-mode character`.
    #[arg(long)]
    character: Option<String>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input `config_list.json`.
    #[arg(long)]
    list: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    All,
    PhonemeOnly,
}

impl From<ModeChoice> for SpeedScaleMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::All => SpeedScaleMode::All,
            ModeChoice::PhonemeOnly => SpeedScaleMode::PhonemeOnly,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StageChoice {
    All,
    Subtitles,
    Character,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Timeline(args) => cmd_timeline(args),
        Command::Intervals(args) => cmd_intervals(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Metadata(args) => cmd_metadata(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let project = Project::from_path(&args.project)?;
    let lines = vvstage::build_timeline(&project, args.mode.into());
    print_json(&lines)
}

fn cmd_intervals(args: StageArgs) -> anyhow::Result<()> {
    let loaded = LoadedStage::load(&args.config)?;
    let stage = loaded.stage(Fps::new(args.fps, 1)?, StageMode::All)?;
    print_json(stage.intervals())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mode = match args.stage_mode {
        StageChoice::All => StageMode::All,
        StageChoice::Subtitles => StageMode::Subtitles,
        StageChoice::Character => StageMode::Character(
            args.character
                .context("--character is required with --stage-mode character")?,
        ),
    };
    let loaded = LoadedStage::load(&args.stage.config)?;
    let stage = loaded.stage(Fps::new(args.stage.fps, 1)?, mode)?;
    print_json(&stage.eval_frame(FrameIndex(args.frame)))
}

fn cmd_metadata(args: StageArgs) -> anyhow::Result<()> {
    let fps = Fps::new(args.fps, 1)?;
    let loaded = LoadedStage::load(&args.config)?;
    let talk_end_sec = vvstage::talk_end_seconds(&loaded.project, SpeedScaleMode::All);
    let duration_in_frames = loaded.duration_in_frames(fps);
    print_json(&serde_json::json!({
        "fps": fps.as_f64(),
        "talkEndSec": talk_end_sec,
        "audioOverrideSec": loaded.audio_override_sec,
        "durationInFrames": duration_in_frames,
        "durationSec": fps.frames_to_secs(duration_in_frames),
    }))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let entries = vvstage::load_config_list(&args.list)?;
    let root = args
        .list
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let mut configs = HashMap::new();
    for entry in &entries {
        match PresentationConfig::from_path(root.join(&entry.config_url)) {
            Ok(config) => {
                configs.insert(entry.config_url.clone(), config);
            }
            Err(e) => {
                tracing::warn!(config_url = %entry.config_url, error = %e, "config not loaded");
            }
        }
    }

    print_json(&vvstage::plan_compositions(&entries, &configs))
}
