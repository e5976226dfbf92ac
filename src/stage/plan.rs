use std::collections::HashMap;

use crate::{
    config::model::{ConfigListEntry, PresentationConfig},
    foundation::core::{Canvas, Fps, VIDEO_CANVAS, VIDEO_FPS},
    stage::evaluator::StageMode,
};

/// Id suffix used when neither the entry nor its path provides one.
pub const FALLBACK_STAGE_ID: &str = "vvproj-subtitles";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One renderable output derived from a config list entry.
pub struct CompositionSpec {
    /// Unique composition id, e.g. `Character-demo-zundamon`.
    pub id: String,
    /// Config the composition evaluates.
    pub config_url: String,
    /// Layers shown.
    pub mode: StageMode,
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
}

/// Id suffix for an entry: explicit id, else the config's parent directory name.
pub fn stage_id(entry: &ConfigListEntry) -> String {
    if let Some(id) = &entry.id {
        return id.clone();
    }
    let parts: Vec<&str> = entry
        .config_url
        .split('/')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.len() {
        n if n >= 2 => parts[n - 2].to_owned(),
        _ => FALLBACK_STAGE_ID.to_owned(),
    }
}

/// All compositions for a config list.
///
/// Every entry gets `All-{id}` and `Subtitles-{id}`; entries whose config is present in
/// `configs` (keyed by `config_url`) also get `Character-{id}-{key}` per character.
pub fn plan_compositions(
    entries: &[ConfigListEntry],
    configs: &HashMap<String, PresentationConfig>,
) -> Vec<CompositionSpec> {
    let mut out = Vec::new();
    for entry in entries {
        let id = stage_id(entry);
        let spec = |id: String, mode: StageMode| CompositionSpec {
            id,
            config_url: entry.config_url.clone(),
            mode,
            canvas: VIDEO_CANVAS,
            fps: VIDEO_FPS,
        };

        out.push(spec(format!("All-{id}"), StageMode::All));
        out.push(spec(format!("Subtitles-{id}"), StageMode::Subtitles));

        let Some(config) = configs.get(&entry.config_url) else {
            tracing::debug!(config_url = %entry.config_url, "no config loaded, skipping characters");
            continue;
        };
        for character in &config.characters {
            let key = character.key();
            out.push(spec(
                format!("Character-{id}-{key}"),
                StageMode::Character(key.to_owned()),
            ));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/stage/plan.rs"]
mod tests;
