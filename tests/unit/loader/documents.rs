use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("loader_unit").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const PROJECT_JSON: &str = r#"
{
  "talk": {
    "audioKeys": ["a"],
    "audioItems": {
      "a": {
        "text": "hello",
        "voice": { "speakerId": "s" },
        "query": {
          "accentPhrases": [{ "moras": [{ "consonantLength": 0.05, "vowelLength": 0.15, "pitch": 5 }] }],
          "prePhonemeLength": 0.1,
          "postPhonemeLength": 0.1
        }
      }
    }
  }
}
"#;

fn write_silent_wav(path: &Path, sample_rate: u32, frames: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        w.write_sample(0i16).unwrap();
    }
    w.finalize().unwrap();
}

#[test]
fn loads_config_and_relative_project() {
    let dir = scratch_dir("relative_project");
    std::fs::create_dir_all(dir.join("proj")).unwrap();
    std::fs::write(dir.join("proj/demo.vvproj"), PROJECT_JSON).unwrap();
    std::fs::write(
        dir.join("config.json"),
        r#"{ "vvprojPath": "proj/demo.vvproj" }"#,
    )
    .unwrap();

    let loaded = LoadedStage::load(&dir.join("config.json")).unwrap();
    assert_eq!(loaded.audio_override_sec, None);
    assert_eq!(loaded.project.ordered_keys().count(), 1);
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(loaded.duration_in_frames(fps), 12);

    let stage = loaded.stage(fps, StageMode::Subtitles).unwrap();
    assert_eq!(stage.frame_lines().len(), 1);
}

#[test]
fn wav_header_overrides_output_length() {
    let dir = scratch_dir("wav_override");
    std::fs::write(dir.join("demo.vvproj"), PROJECT_JSON).unwrap();
    write_silent_wav(&dir.join("narration.wav"), 8000, 20000);
    std::fs::write(
        dir.join("config.json"),
        r#"{ "vvprojPath": "demo.vvproj", "wavPath": "narration.wav" }"#,
    )
    .unwrap();

    assert!((wav_duration_sec(dir.join("narration.wav")).unwrap() - 2.5).abs() < 1e-12);
    let loaded = LoadedStage::load(&dir.join("config.json")).unwrap();
    assert_eq!(loaded.audio_override_sec, Some(2.5));
    assert_eq!(loaded.duration_in_frames(Fps::new(30, 1).unwrap()), 75);
}

#[test]
fn explicit_audio_duration_wins_over_wav() {
    let dir = scratch_dir("explicit_override");
    std::fs::write(dir.join("demo.vvproj"), PROJECT_JSON).unwrap();
    std::fs::write(
        dir.join("config.json"),
        r#"{ "vvprojPath": "demo.vvproj", "wavPath": "absent.wav", "audioDurationSec": 4 }"#,
    )
    .unwrap();

    let loaded = LoadedStage::load(&dir.join("config.json")).unwrap();
    assert_eq!(loaded.audio_override_sec, Some(4.0));
}

#[test]
fn missing_project_is_fatal() {
    let dir = scratch_dir("missing_project");
    std::fs::write(
        dir.join("config.json"),
        r#"{ "vvprojPath": "nope.vvproj" }"#,
    )
    .unwrap();
    let err = LoadedStage::load(&dir.join("config.json")).unwrap_err();
    assert!(err.to_string().contains("nope.vvproj"));
}

#[test]
fn invalid_config_is_rejected_before_project_load() {
    let dir = scratch_dir("invalid_config");
    std::fs::write(
        dir.join("config.json"),
        r#"{ "vvprojPath": "../escape.vvproj" }"#,
    )
    .unwrap();
    let err = LoadedStage::load(&dir.join("config.json")).unwrap_err();
    assert!(matches!(err, VvstageError::Validation(_)));
}

#[test]
fn config_list_reads_entries() {
    let dir = scratch_dir("config_list");
    std::fs::write(
        dir.join("config_list.json"),
        r#"[{ "configUrl": "subtitles/demo/config.json" }]"#,
    )
    .unwrap();
    let list = load_config_list(dir.join("config_list.json")).unwrap();
    assert_eq!(list.len(), 1);
    assert!(load_config_list(dir.join("absent.json")).is_err());
}
