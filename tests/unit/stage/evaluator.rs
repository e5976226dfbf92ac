use super::*;
use crate::{
    config::model::{CharacterConfig, Position, SpeakerStyleOverride},
    project::model::{AccentPhrase, AudioItem, AudioQuery, Mora, Voice},
    style::resolve::DEFAULT_TEXT_COLOR,
};

fn spoken(text: &str, speaker: &str, vowel: f64) -> AudioItem {
    AudioItem {
        text: Some(text.to_owned()),
        voice: Some(Voice {
            speaker_id: Some(speaker.to_owned()),
        }),
        query: Some(AudioQuery {
            accent_phrases: vec![AccentPhrase {
                moras: vec![Mora::new(0.0, vowel, 1.0)],
                pause_mora: None,
                is_interrogative: None,
            }],
            pre_phoneme_length: Some(0.1),
            post_phoneme_length: Some(0.1),
            speed_scale: Some(1.0),
            pause_length_scale: None,
        }),
    }
}

fn character(id: Option<&str>, speaker: &str, toggle: Option<f64>) -> CharacterConfig {
    CharacterConfig {
        id: id.map(str::to_owned),
        speaker_id: speaker.to_owned(),
        image_path: format!("{speaker}.png"),
        active_image_path: None,
        active_image_path2: None,
        flip_x: false,
        active_toggle_frames: toggle,
        position: Position { x: 0.0, y: 0.0 },
        width: 100.0,
        height: 100.0,
    }
}

// a: 0.0..1.0s (active 3..27), b: 1.0..2.0s (active 33..57), a: 2.0..3.0s (active 63..87)
fn project() -> Project {
    Project::from_items([
        ("1".to_owned(), spoken("hello", "a", 0.8)),
        ("2".to_owned(), spoken("hi", "b", 0.8)),
        ("3".to_owned(), spoken("bye", "a", 0.8)),
    ])
}

fn config() -> PresentationConfig {
    PresentationConfig {
        vvproj_path: "p.vvproj".to_owned(),
        speakers: vec![SpeakerStyleOverride {
            speaker_id: "b".to_owned(),
            text_color: Some("#00ff00".to_owned()),
            ..SpeakerStyleOverride::default()
        }],
        characters: vec![
            character(None, "a", Some(6.0)),
            character(Some("right"), "b", None),
        ],
        ..PresentationConfig::default()
    }
}

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn all_mode_reports_subtitle_style_and_characters() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::All).unwrap();

    let f = stage.eval_frame(FrameIndex(40));
    let sub = f.subtitle.unwrap();
    assert_eq!(sub.text, "hi");
    assert_eq!(sub.style.text_color, "#00ff00");
    assert_eq!(f.background_color, DEFAULT_BACKGROUND_COLOR);
    assert_eq!(f.characters.len(), 2);
    assert_eq!(f.characters[0].character_key, "a");
    assert!(f.characters[0].active.is_none());
    let right = &f.characters[1];
    assert_eq!(right.character_key, "right");
    assert_eq!(right.active.unwrap().start, 33);
    assert_eq!(right.local_frame, 7);
    assert_eq!(right.active.unwrap().toggle_frames, 4);

    let f = stage.eval_frame(FrameIndex(5));
    assert_eq!(f.subtitle.unwrap().style.text_color, DEFAULT_TEXT_COLOR);
    assert_eq!(f.characters[0].active.unwrap().toggle_frames, 6);
    assert!(f.characters[1].active.is_none());
}

#[test]
fn padding_frames_show_subtitle_but_closed_mouth() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::All).unwrap();
    let f = stage.eval_frame(FrameIndex(1));
    assert_eq!(f.subtitle.unwrap().key, "1");
    assert!(f.characters[0].active.is_none());
    assert_eq!(f.characters[0].local_frame, 0);
}

#[test]
fn merge_gap_bridges_same_speaker_only() {
    let mut cfg = config();
    cfg.active_merge_gap_frames = Some(40.0);
    let stage = Stage::new(&project(), cfg, fps30(), StageMode::All).unwrap();
    assert_eq!(stage.intervals()["a"].len(), 1);
    assert_eq!(stage.intervals()["a"][0].start, 3);
    assert_eq!(stage.intervals()["a"][0].end, 87);
    assert_eq!(stage.intervals()["b"].len(), 1);
}

#[test]
fn subtitles_mode_hides_characters() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::Subtitles).unwrap();
    let f = stage.eval_frame(FrameIndex(10));
    assert!(f.subtitle.is_some());
    assert!(f.characters.is_empty());
}

#[test]
fn character_mode_shows_one_character_without_subtitles() {
    let stage = Stage::new(
        &project(),
        config(),
        fps30(),
        StageMode::Character("right".to_owned()),
    )
    .unwrap();
    let f = stage.eval_frame(FrameIndex(40));
    assert!(f.subtitle.is_none());
    assert_eq!(f.characters.len(), 1);
    assert_eq!(f.characters[0].speaker_id, "b");
}

#[test]
fn unknown_character_is_rejected() {
    let err = Stage::new(
        &project(),
        config(),
        fps30(),
        StageMode::Character("b".to_owned()),
    )
    .unwrap_err();
    assert!(matches!(err, VvstageError::Validation(_)));
}

#[test]
fn frames_past_the_end_are_empty() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::All).unwrap();
    let f = stage.eval_frame(FrameIndex(500));
    assert!(f.subtitle.is_none());
    assert!(f.characters.iter().all(|c| c.active.is_none()));
}

#[test]
fn duration_prefers_override() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::All).unwrap();
    assert!((stage.talk_end_sec() - 3.0).abs() < 1e-9);
    assert_eq!(stage.duration_in_frames(None), 90);
    assert_eq!(stage.duration_in_frames(Some(10.01)), 301);
    assert_eq!(stage.frame_lines()[2].start_frame, 60);
}

#[test]
fn duration_is_at_least_one_frame() {
    assert_eq!(duration_in_frames(0.0, None, fps30()), 1);
    assert_eq!(duration_in_frames(0.0, Some(0.0), fps30()), 1);
    assert_eq!(duration_in_frames(2.0, Some(f64::NAN), fps30()), 60);
}

#[test]
fn evaluation_is_repeatable() {
    let stage = Stage::new(&project(), config(), fps30(), StageMode::All).unwrap();
    for frame in [0, 33, 57, 89] {
        assert_eq!(
            stage.eval_frame(FrameIndex(frame)),
            stage.eval_frame(FrameIndex(frame))
        );
    }
}
