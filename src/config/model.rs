use crate::{
    foundation::error::{VvstageError, VvstageResult},
    lipsync::intervals::ToggleCadence,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Presentation configuration (`config.json`) for one stage.
///
/// Paths are relative to the directory holding the config file.
pub struct PresentationConfig {
    /// Relative path of the `.vvproj` project.
    pub vvproj_path: String,
    /// Relative path of the rendered narration; its length sizes the output video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wav_path: Option<String>,
    /// Explicit output length in seconds; wins over `wav_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration_sec: Option<f64>,
    /// Stage background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Project-level subtitle fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Project-level subtitle stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    /// Project-level subtitle stroke width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Project-level subtitle font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Project-level subtitle font family (CSS syntax).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Distance of the subtitle box from the bottom edge in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    /// Silent gaps of at most this many frames do not close a speaker's mouth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_merge_gap_frames: Option<f64>,
    /// Per-speaker subtitle style overrides.
    #[serde(default)]
    pub speakers: Vec<SpeakerStyleOverride>,
    /// Character sprites bound to speakers.
    #[serde(default)]
    pub characters: Vec<CharacterConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Subtitle style override for lines spoken by one speaker.
pub struct SpeakerStyleOverride {
    /// Speaker the override applies to.
    pub speaker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A character sprite driven by one speaker's active intervals.
pub struct CharacterConfig {
    /// Stable character id; defaults to `speaker_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Speaker whose lines animate this character.
    pub speaker_id: String,
    /// Idle image.
    pub image_path: String,
    /// First mouth-open image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_image_path: Option<String>,
    /// Second mouth-open image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_image_path2: Option<String>,
    /// Mirror the sprite horizontally.
    #[serde(default)]
    pub flip_x: bool,
    /// Mouth image cadence in frames at speed `1`; rounded, at least `1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_toggle_frames: Option<f64>,
    /// Top-left corner on the canvas.
    pub position: Position,
    /// Sprite box width in pixels.
    pub width: f64,
    /// Sprite box height in pixels.
    pub height: f64,
}

impl CharacterConfig {
    /// Key used in composition ids and stage lookups.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.speaker_id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas position in pixels.
pub struct Position {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One entry of `config_list.json`.
pub struct ConfigListEntry {
    /// Explicit composition id suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Path of the stage's `config.json`.
    pub config_url: String,
}

impl PresentationConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(s: &str) -> VvstageResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| VvstageError::serde(format!("parse subtitle config JSON: {e}")))
    }

    /// Reject configs the stage cannot use.
    pub fn validate(&self) -> VvstageResult<()> {
        validate_rel_source(&self.vvproj_path, "vvprojPath")?;
        if let Some(wav) = &self.wav_path {
            validate_rel_source(wav, "wavPath")?;
        }
        if let Some(sec) = self.audio_duration_sec {
            if !sec.is_finite() || sec < 0.0 {
                return Err(VvstageError::validation(
                    "audioDurationSec must be finite and >= 0",
                ));
            }
        }
        for (name, value) in [
            ("strokeWidth", self.stroke_width),
            ("fontSize", self.font_size),
            ("paddingBottom", self.padding_bottom),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(VvstageError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for speaker in &self.speakers {
            if speaker.speaker_id.trim().is_empty() {
                return Err(VvstageError::validation(
                    "speakers[].speakerId must be non-empty",
                ));
            }
        }

        let mut keys = std::collections::BTreeSet::new();
        for character in &self.characters {
            if character.speaker_id.trim().is_empty() {
                return Err(VvstageError::validation(
                    "characters[].speakerId must be non-empty",
                ));
            }
            if !keys.insert(character.key()) {
                return Err(VvstageError::validation(format!(
                    "duplicate character key '{}'",
                    character.key()
                )));
            }
            if !(character.width.is_finite() && character.width > 0.0)
                || !(character.height.is_finite() && character.height > 0.0)
            {
                return Err(VvstageError::validation(format!(
                    "character '{}' width/height must be finite and > 0",
                    character.key()
                )));
            }
        }
        Ok(())
    }

    /// Merge gap in whole frames.
    ///
    /// Interval bounds are integers, so flooring a fractional gap keeps the same merges.
    /// Missing, NaN and negative values count as `0`.
    pub fn merge_gap_frames(&self) -> u64 {
        match self.active_merge_gap_frames {
            Some(gap) if gap > 0.0 => gap.floor() as u64,
            _ => 0,
        }
    }

    /// Base mouth cadence per speaker. The first character bound to a speaker with a finite
    /// `activeToggleFrames` wins.
    pub fn toggle_cadence(&self) -> ToggleCadence {
        let mut cadence = ToggleCadence::default();
        for character in &self.characters {
            let Some(frames) = character.active_toggle_frames.and_then(base_toggle_frames)
            else {
                continue;
            };
            cadence
                .per_speaker
                .entry(character.speaker_id.clone())
                .or_insert(frames);
        }
        cadence
    }

    /// Character whose key is `key`.
    pub fn character(&self, key: &str) -> Option<&CharacterConfig> {
        self.characters.iter().find(|c| c.key() == key)
    }
}

/// `max(1, round(raw))`; non-finite values are ignored.
fn base_toggle_frames(raw: f64) -> Option<u32> {
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(1.0, f64::from(u32::MAX)) as u32)
}

fn validate_rel_source(source: &str, field: &str) -> VvstageResult<()> {
    if source.trim().is_empty() {
        return Err(VvstageError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VvstageError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(VvstageError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
