use crate::{
    foundation::math::{finite_or_zero, non_negative_finite, scale_or_one},
    project::model::{AccentPhrase, AudioQuery},
};

/// Fixed tail VOICEVOX adds to a question phrase whose last mora is voiced.
pub const INTERROGATIVE_TAIL_SEC: f64 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Which parts of an utterance the speed scale compresses.
pub enum SpeedScaleMode {
    /// Padding and phonemes both shrink with speech rate.
    #[default]
    All,
    /// Only phonemes shrink; pre/post padding is rate-invariant.
    PhonemeOnly,
}

/// Estimated spoken duration of `query` in seconds.
///
/// Total over every input: missing/non-finite lengths count as `0`, a missing or zero
/// `speedScale`/`pauseLengthScale` counts as `1`, and the result is always finite and `>= 0`.
pub fn estimate_duration_sec(query: Option<&AudioQuery>, mode: SpeedScaleMode) -> f64 {
    let Some(query) = query else {
        return 0.0;
    };

    let pause_scale = scale_or_one(query.pause_length_scale);
    let speed_scale = scale_or_one(query.speed_scale);

    let padding_total =
        finite_or_zero(query.pre_phoneme_length) + finite_or_zero(query.post_phoneme_length);
    let phoneme_total: f64 = query
        .accent_phrases
        .iter()
        .map(|phrase| phrase_length_sec(phrase, pause_scale))
        .sum();

    let total = match mode {
        SpeedScaleMode::All => (padding_total + phoneme_total) / speed_scale,
        SpeedScaleMode::PhonemeOnly => padding_total + phoneme_total / speed_scale,
    };
    non_negative_finite(total)
}

fn phrase_length_sec(phrase: &AccentPhrase, pause_scale: f64) -> f64 {
    let mut total: f64 = phrase
        .moras
        .iter()
        .map(|m| finite_or_zero(m.consonant_length) + finite_or_zero(m.vowel_length))
        .sum();

    if let Some(pause) = &phrase.pause_mora {
        total += finite_or_zero(pause.vowel_length) * pause_scale;
    }

    if phrase.is_interrogative.unwrap_or(false)
        && phrase
            .moras
            .last()
            .is_some_and(|last| finite_or_zero(last.pitch) > 0.0)
    {
        total += INTERROGATIVE_TAIL_SEC;
    }

    total
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/duration.rs"]
mod tests;
