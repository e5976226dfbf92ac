use crate::config::model::PresentationConfig;

pub const DEFAULT_TEXT_COLOR: &str = "#0f172a";
pub const DEFAULT_STROKE_COLOR: &str = "rgba(0, 0, 0, 0.7)";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: f64 = 56.0;
pub const DEFAULT_FONT_FAMILY: &str = "'Noto Sans JP', 'Hiragino Sans', sans-serif";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f7f6f2";
pub const DEFAULT_PADDING_BOTTOM: f64 = 80.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Effective subtitle style for one line.
pub struct SubtitleStyle {
    /// Fill color.
    pub text_color: String,
    /// Outline color.
    pub stroke_color: String,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS font family list.
    pub font_family: String,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            text_color: DEFAULT_TEXT_COLOR.to_owned(),
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
        }
    }
}

/// Project-level style: config values over built-in defaults.
pub fn base_style(config: &PresentationConfig) -> SubtitleStyle {
    let builtin = SubtitleStyle::default();
    SubtitleStyle {
        text_color: config.text_color.clone().unwrap_or(builtin.text_color),
        stroke_color: config.stroke_color.clone().unwrap_or(builtin.stroke_color),
        stroke_width: config.stroke_width.unwrap_or(builtin.stroke_width),
        font_size: config.font_size.unwrap_or(builtin.font_size),
        font_family: config.font_family.clone().unwrap_or(builtin.font_family),
    }
}

/// Style for a line spoken by `speaker_id`.
///
/// Resolved field by field: the first `speakers[]` entry for the speaker, then the
/// config's project-level value, then the built-in default.
pub fn resolve_style(speaker_id: Option<&str>, config: &PresentationConfig) -> SubtitleStyle {
    let base = base_style(config);
    let Some(over) = speaker_id
        .and_then(|id| config.speakers.iter().find(|entry| entry.speaker_id == id))
    else {
        return base;
    };

    SubtitleStyle {
        text_color: over.text_color.clone().unwrap_or(base.text_color),
        stroke_color: over.stroke_color.clone().unwrap_or(base.stroke_color),
        stroke_width: over.stroke_width.unwrap_or(base.stroke_width),
        font_size: over.font_size.unwrap_or(base.font_size),
        font_family: over.font_family.clone().unwrap_or(base.font_family),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/resolve.rs"]
mod tests;
