use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    config::model::{ConfigListEntry, PresentationConfig},
    foundation::core::Fps,
    foundation::error::{VvstageError, VvstageResult},
    project::model::Project,
    stage::evaluator::{Stage, StageMode, duration_in_frames},
    timeline::builder::talk_end_seconds,
    timeline::duration::SpeedScaleMode,
};

impl Project {
    /// Parse a project from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VvstageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VvstageError::serde(format!("parse vvproj JSON: {e}")))
    }

    /// Parse a project from a `.vvproj` file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VvstageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open vvproj '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }
}

impl PresentationConfig {
    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VvstageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open subtitle config '{}'", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            VvstageError::serde(format!(
                "parse subtitle config JSON '{}': {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Read a `config_list.json` document.
pub fn load_config_list(path: impl AsRef<Path>) -> VvstageResult<Vec<ConfigListEntry>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open config list '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        VvstageError::serde(format!("parse config list JSON '{}': {e}", path.display()))
    })
}

/// Length of a WAV file in seconds, read from its header.
pub fn wav_duration_sec(path: impl AsRef<Path>) -> VvstageResult<f64> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("read wav header '{}'", path.display()))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err(VvstageError::validation(format!(
            "wav '{}' declares a zero sample rate",
            path.display()
        )));
    }
    Ok(f64::from(reader.duration()) / f64::from(sample_rate))
}

/// A config together with everything it references, resolved relative to its directory.
#[derive(Clone, Debug)]
pub struct LoadedStage {
    /// Where the config was read from.
    pub config_path: PathBuf,
    /// Validated config.
    pub config: PresentationConfig,
    /// Project named by `vvprojPath`.
    pub project: Project,
    /// Output length override: `audioDurationSec`, else the `wavPath` length.
    pub audio_override_sec: Option<f64>,
}

impl LoadedStage {
    #[tracing::instrument]
    /// Load `config_path` and the documents it references.
    pub fn load(config_path: &Path) -> VvstageResult<Self> {
        let config = PresentationConfig::from_path(config_path)?;
        let root = config_path.parent().unwrap_or_else(|| Path::new("."));

        let project = Project::from_path(root.join(&config.vvproj_path))?;

        let audio_override_sec = match (config.audio_duration_sec, &config.wav_path) {
            (Some(sec), _) => Some(sec),
            (None, Some(wav)) => Some(wav_duration_sec(root.join(wav))?),
            (None, None) => None,
        };
        if let Some(sec) = audio_override_sec {
            tracing::debug!(sec, "output length overridden by audio");
        }

        Ok(Self {
            config_path: config_path.to_path_buf(),
            config,
            project,
            audio_override_sec,
        })
    }

    /// Stage for `mode` at `fps`.
    pub fn stage(&self, fps: Fps, mode: StageMode) -> VvstageResult<Stage> {
        Stage::new(&self.project, self.config.clone(), fps, mode)
    }

    /// Output length in frames.
    pub fn duration_in_frames(&self, fps: Fps) -> u64 {
        duration_in_frames(
            talk_end_seconds(&self.project, SpeedScaleMode::All),
            self.audio_override_sec,
            fps,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/documents.rs"]
mod tests;
