//! vvstage turns a VOICEVOX project into the timing data of a lip-synced, subtitled
//! character video.
//!
//! # Pipeline overview
//!
//! 1. **Estimate**: `AudioQuery -> seconds` from phoneme-level metadata ([`estimate_duration_sec`])
//! 2. **Lay out**: `Project -> [TalkLine]`, contiguous from `0` ([`build_timeline`])
//! 3. **Quantize**: `TalkLine + Fps -> FrameLine` (subtitle and mouth-active windows)
//! 4. **Synthesize**: `[FrameLine] -> speaker -> [ActiveInterval]`, merged across short gaps
//! 5. **Evaluate**: `Stage + FrameIndex -> StageFrame` (subtitle text, style, character states)
//!
//! Steps 1-5 are pure and deterministic: the same project, config, frame rate and mode always
//! produce the same output, and nothing is cached between calls. Document IO lives only in
//! [`LoadedStage`] and the other loader helpers.
#![forbid(unsafe_code)]

mod config;
mod foundation;
mod lipsync;
mod loader;
mod project;
mod stage;
mod style;
mod timeline;

pub use config::model::{
    CharacterConfig, ConfigListEntry, Position, PresentationConfig, SpeakerStyleOverride,
};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, VIDEO_CANVAS, VIDEO_FPS};
pub use foundation::error::{VvstageError, VvstageResult};
pub use lipsync::intervals::{
    ActiveInterval, DEFAULT_TOGGLE_FRAMES, ToggleCadence, active_interval_at,
    active_intervals_by_speaker, merge_intervals, raw_intervals, toggle_frames,
};
pub use loader::documents::{LoadedStage, load_config_list, wav_duration_sec};
pub use project::model::{AccentPhrase, AudioItem, AudioQuery, Mora, Project, Talk, Voice};
pub use stage::evaluator::{
    CharacterFrame, Stage, StageFrame, StageMode, SubtitleFrame, duration_in_frames,
};
pub use stage::plan::{CompositionSpec, FALLBACK_STAGE_ID, plan_compositions, stage_id};
pub use style::resolve::{SubtitleStyle, base_style, resolve_style};
pub use timeline::builder::{TalkLine, build_timeline, talk_end_seconds};
pub use timeline::duration::{INTERROGATIVE_TAIL_SEC, SpeedScaleMode, estimate_duration_sec};
pub use timeline::frames::{FrameLine, frame_lines, line_at};
