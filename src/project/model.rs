use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::foundation::error::{VvstageError, VvstageResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A VOICEVOX project (`.vvproj`), reduced to the talk section.
///
/// Every field is optional in the document; missing or `null` containers read as empty.
pub struct Project {
    /// Talk section (utterances and their playback order).
    #[serde(default, deserialize_with = "null_as_default")]
    pub talk: Talk,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Utterances keyed by opaque id plus their explicit playback order.
pub struct Talk {
    /// Explicit playback order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_keys: Option<Vec<String>>,
    /// Legacy name of [`Talk::audio_keys`]; only consulted when `audio_keys` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_item_keys: Option<Vec<String>>,
    /// Utterances in document declaration order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio_items: IndexMap<String, AudioItem>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One utterance.
pub struct AudioItem {
    /// Subtitle text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Voice selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    /// Synthesis query carrying the phoneme timing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<AudioQuery>,
}

impl AudioItem {
    /// Speaker id of the selected voice, if any.
    pub fn speaker_id(&self) -> Option<&str> {
        self.voice.as_ref()?.speaker_id.as_deref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Voice selection of an utterance.
pub struct Voice {
    /// Opaque speaker id (style UUID in VOICEVOX projects).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Timing-relevant subset of a VOICEVOX `AudioQuery`.
pub struct AudioQuery {
    /// Prosodic phrases in speaking order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub accent_phrases: Vec<AccentPhrase>,
    /// Leading silence in seconds.
    #[serde(default)]
    pub pre_phoneme_length: Option<f64>,
    /// Trailing silence in seconds.
    #[serde(default)]
    pub post_phoneme_length: Option<f64>,
    /// Playback-rate multiplier.
    #[serde(default)]
    pub speed_scale: Option<f64>,
    /// Multiplier applied to inter-phrase pauses.
    #[serde(default)]
    pub pause_length_scale: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A run of moras forming one prosodic unit.
pub struct AccentPhrase {
    /// Timed moras.
    #[serde(default, deserialize_with = "null_as_default")]
    pub moras: Vec<Mora>,
    /// Silent pause after the phrase.
    #[serde(default)]
    pub pause_mora: Option<Mora>,
    /// Rising question intonation on the phrase tail.
    #[serde(default)]
    pub is_interrogative: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Smallest timed unit: consonant plus vowel.
pub struct Mora {
    /// Consonant length in seconds.
    #[serde(default)]
    pub consonant_length: Option<f64>,
    /// Vowel length in seconds.
    #[serde(default)]
    pub vowel_length: Option<f64>,
    /// Pitch; values `> 0` are voiced.
    #[serde(default)]
    pub pitch: Option<f64>,
}

impl Mora {
    /// Mora with consonant/vowel lengths and a pitch.
    pub fn new(consonant_length: f64, vowel_length: f64, pitch: f64) -> Self {
        Self {
            consonant_length: Some(consonant_length),
            vowel_length: Some(vowel_length),
            pitch: Some(pitch),
        }
    }
}

impl Project {
    /// Parse a project from JSON text.
    pub fn from_json_str(s: &str) -> VvstageResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| VvstageError::serde(format!("parse vvproj JSON: {e}")))
    }

    /// Build a project whose playback order is the iteration order of `items`.
    pub fn from_items(items: impl IntoIterator<Item = (String, AudioItem)>) -> Self {
        Self {
            talk: Talk {
                audio_keys: None,
                audio_item_keys: None,
                audio_items: items.into_iter().collect(),
            },
        }
    }

    /// Playback order: `audioKeys`, else `audioItemKeys`, else declaration order.
    ///
    /// Keys may dangle; see [`Project::item`].
    pub fn ordered_keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        let talk = &self.talk;
        match talk.audio_keys.as_ref().or(talk.audio_item_keys.as_ref()) {
            Some(keys) => Box::new(keys.iter().map(String::as_str)),
            None => Box::new(talk.audio_items.keys().map(String::as_str)),
        }
    }

    /// Utterance stored under `key`.
    pub fn item(&self, key: &str) -> Option<&AudioItem> {
        self.talk.audio_items.get(key)
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "../../tests/unit/project/model.rs"]
mod tests;
