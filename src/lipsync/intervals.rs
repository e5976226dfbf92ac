use std::collections::BTreeMap;

use crate::{
    foundation::core::{FrameIndex, FrameRange},
    foundation::math::positive_speed_or_one,
    timeline::frames::FrameLine,
};

/// Mouth-toggle cadence used for speakers without a configured one.
pub const DEFAULT_TOGGLE_FRAMES: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A frame range during which a speaker's mouth animates.
pub struct ActiveInterval {
    /// First active frame.
    pub start: u64,
    /// Exclusive end frame.
    pub end: u64,
    /// Frames per mouth image while active, already adjusted for speech rate.
    pub toggle_frames: u32,
    /// Speech rate of the (latest merged) utterance.
    pub speed_scale: f64,
}

impl ActiveInterval {
    /// `[start, end)` as a [`FrameRange`].
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start),
            end: FrameIndex(self.end),
        }
    }

    /// Whether `frame` lies inside the interval.
    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.range().contains(frame)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Base mouth-toggle cadence (in frames at speed `1`) per speaker.
pub struct ToggleCadence {
    /// Cadence for speakers missing from `per_speaker`.
    pub default_frames: u32,
    /// Speaker id -> base cadence.
    pub per_speaker: BTreeMap<String, u32>,
}

impl Default for ToggleCadence {
    fn default() -> Self {
        Self {
            default_frames: DEFAULT_TOGGLE_FRAMES,
            per_speaker: BTreeMap::new(),
        }
    }
}

impl ToggleCadence {
    /// Base cadence for `speaker_id`.
    pub fn base_for(&self, speaker_id: &str) -> u32 {
        self.per_speaker
            .get(speaker_id)
            .copied()
            .unwrap_or(self.default_frames)
    }
}

/// `max(1, round(base / speed))`; non-positive speeds count as `1`.
pub fn toggle_frames(base_frames: u32, speed_scale: f64) -> u32 {
    let speed = positive_speed_or_one(speed_scale);
    let scaled = (f64::from(base_frames) / speed).round();
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (scaled as u32).max(1)
    }
}

/// Unmerged active windows per speaker, in line order. Lines without a speaker are skipped.
pub fn raw_intervals(
    lines: &[FrameLine],
    cadence: &ToggleCadence,
) -> BTreeMap<String, Vec<ActiveInterval>> {
    let mut out: BTreeMap<String, Vec<ActiveInterval>> = BTreeMap::new();
    for line in lines {
        let Some(speaker_id) = line.line.speaker_id.as_deref() else {
            continue;
        };
        let speed_scale = line.line.speed_scale;
        out.entry(speaker_id.to_owned())
            .or_default()
            .push(ActiveInterval {
                start: line.active_start_frame,
                end: line.active_end_frame,
                toggle_frames: toggle_frames(cadence.base_for(speaker_id), speed_scale),
                speed_scale,
            });
    }
    out
}

/// Coalesce intervals separated by at most `gap_frames` frames.
///
/// Input order does not matter. The merged run takes the cadence of the later interval. The
/// output is sorted, non-overlapping, and re-merging it with the same gap is a no-op.
pub fn merge_intervals(mut intervals: Vec<ActiveInterval>, gap_frames: u64) -> Vec<ActiveInterval> {
    intervals.sort_by_key(|iv| iv.start);

    let mut merged: Vec<ActiveInterval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        match merged.last_mut() {
            Some(last) if next.start <= last.end.saturating_add(gap_frames) => {
                last.end = last.end.max(next.end);
                last.toggle_frames = next.toggle_frames;
                last.speed_scale = next.speed_scale;
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Merged active intervals for every speaker appearing in `lines`.
#[tracing::instrument(skip(lines, cadence))]
pub fn active_intervals_by_speaker(
    lines: &[FrameLine],
    cadence: &ToggleCadence,
    gap_frames: u64,
) -> BTreeMap<String, Vec<ActiveInterval>> {
    raw_intervals(lines, cadence)
        .into_iter()
        .map(|(speaker, raw)| {
            let raw_len = raw.len();
            let merged = merge_intervals(raw, gap_frames);
            tracing::debug!(%speaker, raw = raw_len, merged = merged.len(), "merged active intervals");
            (speaker, merged)
        })
        .collect()
}

/// First interval containing `frame`.
pub fn active_interval_at(intervals: &[ActiveInterval], frame: FrameIndex) -> Option<&ActiveInterval> {
    intervals.iter().find(|iv| iv.contains(frame))
}

#[cfg(test)]
#[path = "../../tests/unit/lipsync/intervals.rs"]
mod tests;
