use crate::{
    foundation::math::finite_or_zero,
    project::model::Project,
    timeline::duration::{SpeedScaleMode, estimate_duration_sec},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One utterance placed on the timeline.
pub struct TalkLine {
    /// Item key in the project.
    pub key: String,
    /// Subtitle text (empty when the item has none).
    pub text: String,
    /// Speaker of the selected voice.
    pub speaker_id: Option<String>,
    /// Leading silence in seconds, before speed scaling.
    pub pre_phoneme_length: f64,
    /// Trailing silence in seconds, before speed scaling.
    pub post_phoneme_length: f64,
    /// Playback-rate multiplier (`1` when absent).
    pub speed_scale: f64,
    /// Start on the timeline in seconds.
    pub start_sec: f64,
    /// End on the timeline in seconds.
    pub end_sec: f64,
    /// `end_sec - start_sec`.
    pub duration_sec: f64,
}

impl TalkLine {
    /// Whether the line carries visible subtitle text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Lay out every reachable utterance of `project` back to back, starting at `0`.
///
/// Dangling order keys are skipped. Lines without text stay on the timeline so that later
/// lines keep their start times; subtitle consumers filter them with [`TalkLine::has_text`].
#[tracing::instrument(skip(project))]
pub fn build_timeline(project: &Project, mode: SpeedScaleMode) -> Vec<TalkLine> {
    let mut lines = Vec::new();
    let mut cursor = 0.0;

    for key in project.ordered_keys() {
        let Some(item) = project.item(key) else {
            tracing::debug!(key, "skipping dangling audio key");
            continue;
        };
        let query = item.query.as_ref();
        let duration_sec = estimate_duration_sec(query, mode);
        let start_sec = cursor;
        let end_sec = start_sec + duration_sec;

        let speed_scale = query
            .and_then(|q| q.speed_scale)
            .filter(|v| v.is_finite())
            .unwrap_or(1.0);

        lines.push(TalkLine {
            key: key.to_owned(),
            text: item.text.clone().unwrap_or_default(),
            speaker_id: item.speaker_id().map(str::to_owned),
            pre_phoneme_length: finite_or_zero(query.and_then(|q| q.pre_phoneme_length)),
            post_phoneme_length: finite_or_zero(query.and_then(|q| q.post_phoneme_length)),
            speed_scale,
            start_sec,
            end_sec,
            duration_sec,
        });

        cursor = end_sec;
    }

    tracing::debug!(lines = lines.len(), end_sec = cursor, "timeline built");
    lines
}

/// End of the last utterance in seconds, or `0` for an empty project.
pub fn talk_end_seconds(project: &Project, mode: SpeedScaleMode) -> f64 {
    build_timeline(project, mode)
        .last()
        .map_or(0.0, |line| line.end_sec)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
