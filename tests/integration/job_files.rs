// Job files on disk produce the same command lines as jobs built in code

use crate::common::helpers::{job_line, ladder_job};
use ffjob::engine::{Job, load_job};
use std::fs;
use tempfile::TempDir;

const LADDER_TOML: &str = r#"
[global]
overwrite = true
no_stats = true

[global.log]
level = "error"

[[inputs]]
path = "in.mp4"

[inputs.options.decoding]
hardware_acceleration = "cuda"
hardware_acceleration_device = 0
position = "10"

[complex_filter]
auto_split = 2
separator = "semicolon"

[[complex_filter.chains]]
inputs = [{ name = "out0" }]
filters = ["scale=1280:720"]
outputs = [{ name = "v720" }]

[[complex_filter.chains]]
inputs = [{ name = "out1" }]
filters = ["scale=640:360"]
outputs = [{ name = "v360" }]

[[outputs]]
path = "720p.mp4"

[outputs.options]
format = "mp4"
map = [{ name = "[v720]" }, { input_file_id = 0, stream = { media_type = "audio" } }]

[outputs.options.encoding]
crf = 23
preset = "fast"
bitrate = [{ stream = { media_type = "video" }, value = "2.5M" }]
codec = [
    { stream = { media_type = "video" }, value = "libx264" },
    { stream = { media_type = "audio" }, value = "aac" },
]

[[outputs]]
path = "360p.mp4"

[outputs.options]
map = [{ name = "[v360]" }]

[outputs.options.encoding]
remove_audio = true
bitrate = [{ stream = { media_type = "video" }, value = "800K" }]
codec = [{ stream = { media_type = "video" }, value = "libx264" }]
"#;

#[test]
fn test_toml_ladder_matches_builder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ladder.toml");
    fs::write(&path, LADDER_TOML).unwrap();

    let job = load_job(&path).unwrap();
    assert_eq!(job_line(&job), job_line(&ladder_job()));
}

#[test]
fn test_json_job_with_numbers_and_custom_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job.json");
    fs::write(
        &path,
        r#"{
            "inputs": [{ "path": "in.mov" }],
            "outputs": [{
                "path": "out.mkv",
                "options": {
                    "encoding": {
                        "buf_size": 1000000,
                        "max_rate": [{ "value": "1.5Mi" }],
                        "custom": { "x264-params": "keyint=60", "threads": 4 }
                    }
                }
            }]
        }"#,
    )
    .unwrap();

    let job = load_job(&path).unwrap();
    assert_eq!(
        job_line(&job),
        "-hide_banner -i in.mov -bufsize 1000000 -maxrate 1.5Mi -threads 4 -x264-params keyint=60 -y out.mkv"
    );
}

#[test]
fn test_saved_json_reloads_to_same_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ladder.json");
    fs::write(&path, serde_json::to_string_pretty(&ladder_job()).unwrap()).unwrap();

    let job: Job = load_job(&path).unwrap();
    assert_eq!(job_line(&job), job_line(&ladder_job()));
}

#[test]
fn test_bad_number_in_job_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
[[outputs]]
path = "out.mp4"

[outputs.options.encoding]
buf_size = "12Q"
"#,
    )
    .unwrap();

    let message = format!("{:#}", load_job(&path).unwrap_err());
    assert!(message.contains("bad.toml"), "{}", message);
    assert!(message.contains("12Q"), "{}", message);
}
