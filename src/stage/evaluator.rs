use std::collections::BTreeMap;

use crate::{
    config::model::PresentationConfig,
    foundation::core::{Fps, FrameIndex},
    foundation::error::{VvstageError, VvstageResult},
    lipsync::intervals::{ActiveInterval, active_interval_at, active_intervals_by_speaker},
    project::model::Project,
    style::resolve::{
        DEFAULT_BACKGROUND_COLOR, DEFAULT_PADDING_BOTTOM, SubtitleStyle, resolve_style,
    },
    timeline::builder::{TalkLine, build_timeline},
    timeline::duration::SpeedScaleMode,
    timeline::frames::{FrameLine, frame_lines, line_at},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Which layers a stage composition shows.
pub enum StageMode {
    /// Subtitles and every character.
    All,
    /// Subtitles only.
    Subtitles,
    /// One character, addressed by [`crate::CharacterConfig::key`].
    Character(String),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Everything the renderer needs to draw one frame.
pub struct StageFrame {
    /// Evaluated frame.
    pub frame: FrameIndex,
    /// Stage background color.
    pub background_color: String,
    /// Distance of the subtitle box from the bottom edge in pixels.
    pub padding_bottom: f64,
    /// Visible subtitle, if a line is on screen.
    pub subtitle: Option<SubtitleFrame>,
    /// Character states in configuration order.
    pub characters: Vec<CharacterFrame>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Subtitle shown on a frame.
pub struct SubtitleFrame {
    /// Item key of the line.
    pub key: String,
    /// Text to draw.
    pub text: String,
    /// Speaker of the line.
    pub speaker_id: Option<String>,
    /// Resolved style.
    pub style: SubtitleStyle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// A character's speaking state on a frame.
pub struct CharacterFrame {
    /// Character key.
    pub character_key: String,
    /// Speaker driving the character.
    pub speaker_id: String,
    /// Interval the frame falls in, when speaking.
    pub active: Option<ActiveInterval>,
    /// Frames since the active interval started (`0` when idle).
    pub local_frame: u64,
}

/// Precomputed, immutable stage state for one project + config.
///
/// Construction does all timeline work once; [`Stage::eval_frame`] is a pure lookup.
#[derive(Clone, Debug)]
pub struct Stage {
    config: PresentationConfig,
    fps: Fps,
    mode: StageMode,
    lines: Vec<TalkLine>,
    frame_lines: Vec<FrameLine>,
    intervals: BTreeMap<String, Vec<ActiveInterval>>,
}

impl Stage {
    /// Build a stage with the default [`SpeedScaleMode::All`] timing.
    pub fn new(
        project: &Project,
        config: PresentationConfig,
        fps: Fps,
        mode: StageMode,
    ) -> VvstageResult<Self> {
        Self::with_speed_mode(project, config, fps, mode, SpeedScaleMode::All)
    }

    #[tracing::instrument(skip(project, config))]
    /// Build a stage with an explicit speed-scale mode.
    pub fn with_speed_mode(
        project: &Project,
        config: PresentationConfig,
        fps: Fps,
        mode: StageMode,
        speed_mode: SpeedScaleMode,
    ) -> VvstageResult<Self> {
        if let StageMode::Character(key) = &mode {
            if config.character(key).is_none() {
                return Err(VvstageError::validation(format!(
                    "stage mode references unknown character '{key}'"
                )));
            }
        }

        let lines = build_timeline(project, speed_mode);
        let frame_lines = frame_lines(&lines, fps, speed_mode);
        let intervals = active_intervals_by_speaker(
            &frame_lines,
            &config.toggle_cadence(),
            config.merge_gap_frames(),
        );

        for character in &config.characters {
            if !intervals.contains_key(&character.speaker_id) {
                tracing::warn!(
                    character = character.key(),
                    speaker = %character.speaker_id,
                    "character speaker has no lines"
                );
            }
        }

        Ok(Self {
            config,
            fps,
            mode,
            lines,
            frame_lines,
            intervals,
        })
    }

    /// Full timeline, blank lines included.
    pub fn lines(&self) -> &[TalkLine] {
        &self.lines
    }

    /// Subtitle-bearing lines quantized to frames.
    pub fn frame_lines(&self) -> &[FrameLine] {
        &self.frame_lines
    }

    /// Merged active intervals per speaker.
    pub fn intervals(&self) -> &BTreeMap<String, Vec<ActiveInterval>> {
        &self.intervals
    }

    /// Frame rate the stage was quantized at.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// End of the last line in seconds.
    pub fn talk_end_sec(&self) -> f64 {
        self.lines.last().map_or(0.0, |line| line.end_sec)
    }

    /// Output length: `override_sec` when given, else the talk end.
    pub fn duration_in_frames(&self, override_sec: Option<f64>) -> u64 {
        duration_in_frames(self.talk_end_sec(), override_sec, self.fps)
    }

    /// Evaluate one frame.
    pub fn eval_frame(&self, frame: FrameIndex) -> StageFrame {
        let show_subtitles = matches!(self.mode, StageMode::All | StageMode::Subtitles);
        let subtitle = if show_subtitles {
            line_at(&self.frame_lines, frame).map(|fl| SubtitleFrame {
                key: fl.line.key.clone(),
                text: fl.line.text.clone(),
                speaker_id: fl.line.speaker_id.clone(),
                style: resolve_style(fl.line.speaker_id.as_deref(), &self.config),
            })
        } else {
            None
        };

        let characters = self
            .config
            .characters
            .iter()
            .filter(|c| match &self.mode {
                StageMode::All => true,
                StageMode::Subtitles => false,
                StageMode::Character(key) => c.key() == key,
            })
            .map(|c| {
                let active = self
                    .intervals
                    .get(&c.speaker_id)
                    .and_then(|ivs| active_interval_at(ivs, frame))
                    .copied();
                CharacterFrame {
                    character_key: c.key().to_owned(),
                    speaker_id: c.speaker_id.clone(),
                    local_frame: active.map_or(0, |iv| frame.0 - iv.start),
                    active,
                }
            })
            .collect();

        StageFrame {
            frame,
            background_color: self
                .config
                .background_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_owned()),
            padding_bottom: self.config.padding_bottom.unwrap_or(DEFAULT_PADDING_BOTTOM),
            subtitle,
            characters,
        }
    }
}

/// `max(1, ceil(seconds * fps))`, where `seconds` is `override_sec` if present.
///
/// The override only sizes the output; line timing is unaffected.
pub fn duration_in_frames(talk_end_sec: f64, override_sec: Option<f64>, fps: Fps) -> u64 {
    let secs = override_sec
        .filter(|s| s.is_finite())
        .unwrap_or(talk_end_sec);
    fps.secs_to_frames_ceil(secs).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/evaluator.rs"]
mod tests;
