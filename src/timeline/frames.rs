use crate::{
    foundation::core::{Fps, FrameIndex, FrameRange},
    foundation::math::positive_speed_or_one,
    timeline::builder::TalkLine,
    timeline::duration::SpeedScaleMode,
};

// Window starts stop one short of `u64::MAX` so every window keeps a non-empty end.
const LAST_START_FRAME: u64 = u64::MAX - 1;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A [`TalkLine`] quantized to frames.
pub struct FrameLine {
    /// Source line.
    #[serde(flatten)]
    pub line: TalkLine,
    /// First frame the subtitle is shown.
    pub start_frame: u64,
    /// Exclusive end of the subtitle; always `> start_frame`.
    pub end_frame: u64,
    /// First frame the speaker's mouth is active.
    pub active_start_frame: u64,
    /// Exclusive end of the mouth-active window; always `> active_start_frame`.
    pub active_end_frame: u64,
}

impl FrameLine {
    /// Quantize one line.
    ///
    /// The active window is the speech window minus the leading/trailing silence as it was
    /// laid out by `mode` (divided by the speed scale in [`SpeedScaleMode::All`]).
    pub fn from_talk_line(line: TalkLine, fps: Fps, mode: SpeedScaleMode) -> Self {
        let start_frame = fps.secs_to_frames_floor(line.start_sec).min(LAST_START_FRAME);
        let end_frame = fps
            .secs_to_frames_ceil(line.end_sec)
            .max(start_frame.saturating_add(1));

        let (pre_pad, post_pad) = match mode {
            SpeedScaleMode::All => {
                let speed = positive_speed_or_one(line.speed_scale);
                (
                    line.pre_phoneme_length / speed,
                    line.post_phoneme_length / speed,
                )
            }
            SpeedScaleMode::PhonemeOnly => (line.pre_phoneme_length, line.post_phoneme_length),
        };
        let active_start_sec = (line.start_sec + pre_pad.max(0.0)).min(line.end_sec);
        let active_end_sec = (line.end_sec - post_pad.max(0.0)).max(active_start_sec);

        let active_start_frame = fps
            .secs_to_frames_floor(active_start_sec)
            .min(LAST_START_FRAME);
        let active_end_frame = fps
            .secs_to_frames_ceil(active_end_sec)
            .max(active_start_frame.saturating_add(1));

        Self {
            line,
            start_frame,
            end_frame,
            active_start_frame,
            active_end_frame,
        }
    }

    /// Subtitle display window `[start_frame, end_frame)`.
    pub fn display_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start_frame),
            end: FrameIndex(self.end_frame),
        }
    }

    /// Mouth-active window `[active_start_frame, active_end_frame)`.
    pub fn active_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.active_start_frame),
            end: FrameIndex(self.active_end_frame),
        }
    }
}

/// Quantize the subtitle-bearing lines; lines with blank text are dropped here.
pub fn frame_lines(lines: &[TalkLine], fps: Fps, mode: SpeedScaleMode) -> Vec<FrameLine> {
    lines
        .iter()
        .filter(|line| line.has_text())
        .map(|line| FrameLine::from_talk_line(line.clone(), fps, mode))
        .collect()
}

/// First line whose display window contains `frame`.
pub fn line_at(lines: &[FrameLine], frame: FrameIndex) -> Option<&FrameLine> {
    lines.iter().find(|line| line.display_range().contains(frame))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/frames.rs"]
mod tests;
