use super::*;

fn line(start_sec: f64, end_sec: f64, pre: f64, post: f64, speed: f64) -> TalkLine {
    TalkLine {
        key: "k".to_owned(),
        text: "text".to_owned(),
        speaker_id: Some("s".to_owned()),
        pre_phoneme_length: pre,
        post_phoneme_length: post,
        speed_scale: speed,
        start_sec,
        end_sec,
        duration_sec: end_sec - start_sec,
    }
}

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn display_window_floors_start_and_ceils_end() {
    let fl = FrameLine::from_talk_line(line(0.51, 1.01, 0.0, 0.0, 1.0), fps30(), SpeedScaleMode::All);
    assert_eq!(fl.start_frame, 15);
    assert_eq!(fl.end_frame, 31);
}

#[test]
fn zero_length_line_still_gets_one_frame() {
    let fl = FrameLine::from_talk_line(line(2.0, 2.0, 0.1, 0.1, 1.0), fps30(), SpeedScaleMode::All);
    assert_eq!(fl.start_frame, 60);
    assert_eq!(fl.end_frame, 61);
    assert_eq!(fl.active_start_frame, 60);
    assert_eq!(fl.active_end_frame, 61);
}

#[test]
fn active_window_excludes_padding() {
    let fl = FrameLine::from_talk_line(line(1.0, 2.0, 0.1, 0.2, 1.0), fps30(), SpeedScaleMode::All);
    assert_eq!(fl.start_frame, 30);
    assert_eq!(fl.end_frame, 60);
    assert_eq!(fl.active_start_frame, 33);
    assert_eq!(fl.active_end_frame, 54);
}

#[test]
fn active_padding_follows_speed_mode() {
    let all = FrameLine::from_talk_line(line(0.0, 1.0, 0.2, 0.2, 2.0), fps30(), SpeedScaleMode::All);
    assert_eq!(all.active_start_frame, 3);
    assert_eq!(all.active_end_frame, 27);

    let phoneme_only =
        FrameLine::from_talk_line(line(0.0, 1.0, 0.2, 0.2, 2.0), fps30(), SpeedScaleMode::PhonemeOnly);
    assert_eq!(phoneme_only.active_start_frame, 6);
    assert_eq!(phoneme_only.active_end_frame, 24);
}

#[test]
fn oversized_padding_clamps_inward() {
    let fl = FrameLine::from_talk_line(line(1.0, 1.5, 1.0, 1.0, 1.0), fps30(), SpeedScaleMode::All);
    assert_eq!(fl.active_start_frame, 45);
    assert_eq!(fl.active_end_frame, 46);
    assert!(fl.active_end_frame > fl.active_start_frame);
}

#[test]
fn frame_lines_drop_blank_text_and_keep_timing() {
    let mut blank = line(0.0, 1.0, 0.0, 0.0, 1.0);
    blank.text = "  \n".to_owned();
    let lines = vec![blank, line(1.0, 2.0, 0.0, 0.0, 1.0)];
    let framed = frame_lines(&lines, fps30(), SpeedScaleMode::All);
    assert_eq!(framed.len(), 1);
    assert_eq!(framed[0].start_frame, 30);
}

#[test]
fn line_at_picks_first_containing_window() {
    let lines = frame_lines(
        &[line(0.0, 1.0, 0.0, 0.0, 1.0), line(1.0, 2.0, 0.0, 0.0, 1.0)],
        fps30(),
        SpeedScaleMode::All,
    );
    assert_eq!(line_at(&lines, FrameIndex(29)).unwrap().start_frame, 0);
    assert_eq!(line_at(&lines, FrameIndex(30)).unwrap().start_frame, 30);
    assert!(line_at(&lines, FrameIndex(60)).is_none());
}

#[test]
fn saturated_start_keeps_windows_non_empty() {
    let fl = FrameLine::from_talk_line(line(1e18, 1e18, 0.0, 0.0, 1.0), fps30(), SpeedScaleMode::All);
    assert_eq!(fl.start_frame, LAST_START_FRAME);
    assert_eq!(fl.end_frame, u64::MAX);
    assert_eq!(fl.active_start_frame, LAST_START_FRAME);
    assert_eq!(fl.active_end_frame, u64::MAX);
}

#[test]
fn huge_leading_line_does_not_overflow_later_windows() {
    use crate::project::model::{AccentPhrase, AudioItem, AudioQuery, Mora, Project};
    use crate::timeline::builder::build_timeline;

    let item = |text: &str, vowel: f64| AudioItem {
        text: Some(text.to_owned()),
        voice: None,
        query: Some(AudioQuery {
            accent_phrases: vec![AccentPhrase {
                moras: vec![Mora::new(0.0, vowel, 1.0)],
                pause_mora: None,
                is_interrogative: None,
            }],
            ..AudioQuery::default()
        }),
    };
    let project = Project::from_items([
        ("a".to_owned(), item("a", 1e18)),
        ("b".to_owned(), item("b", 0.1)),
    ]);

    let lines = build_timeline(&project, SpeedScaleMode::All);
    assert_eq!(lines[1].start_sec, 1e18);
    for mode in [SpeedScaleMode::All, SpeedScaleMode::PhonemeOnly] {
        let framed = frame_lines(&lines, fps30(), mode);
        assert_eq!(framed.len(), 2);
        for fl in &framed {
            assert!(fl.end_frame > fl.start_frame);
            assert!(fl.active_end_frame > fl.active_start_frame);
        }
    }
}
