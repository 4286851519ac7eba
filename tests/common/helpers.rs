#![allow(dead_code)]

use ffjob::engine::{
    ChainSeparator, CommandArgs, ComplexFilterGraph, DecodingOptions, EncodingOptions,
    FilterChain, GlobalOptions, Input, InputOptions, Job, LogLevel, LogOptions, MapOption,
    MediaType, Number, Output, OutputOptions, StreamOption, StreamSpecifier, UnitPrefix,
    build_args,
};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Convert a Command to a string for testing/assertions
pub fn cmd_to_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect();

    format!("{} {}", program, args.join(" "))
}

/// Tokens of a job joined with single spaces, unquoted
pub fn job_line(job: &Job) -> String {
    build_args(job).unwrap().args().join(" ")
}

pub fn tokens(job: &Job) -> CommandArgs {
    build_args(job).unwrap()
}

fn video() -> StreamSpecifier {
    StreamSpecifier::of_type(MediaType::Video)
}

fn audio() -> StreamSpecifier {
    StreamSpecifier::of_type(MediaType::Audio)
}

/// One input split into a 720p and a 360p rendition
pub fn ladder_job() -> Job {
    let graph = ComplexFilterGraph {
        auto_split: Some(2),
        chains: vec![
            FilterChain {
                inputs: vec![StreamSpecifier::named("out0")],
                filters: vec!["scale=1280:720".to_string()],
                outputs: vec![StreamSpecifier::named("v720")],
            },
            FilterChain {
                inputs: vec![StreamSpecifier::named("out1")],
                filters: vec!["scale=640:360".to_string()],
                outputs: vec![StreamSpecifier::named("v360")],
            },
        ],
        separator: ChainSeparator::Semicolon,
    };

    let hd = Output::new("720p.mp4").with_options(OutputOptions {
        map: vec![MapOption::named("[v720]"), MapOption::input(0, Some(audio()))],
        encoding: Some(EncodingOptions {
            bitrate: vec![StreamOption::for_stream(
                video(),
                Number::float(2.5).with_prefix(UnitPrefix::Mega),
            )],
            codec: vec![
                StreamOption::for_stream(video(), "libx264".to_string()),
                StreamOption::for_stream(audio(), "aac".to_string()),
            ],
            crf: Some(23),
            preset: Some("fast".to_string()),
            ..EncodingOptions::default()
        }),
        format: Some("mp4".to_string()),
    });

    let sd = Output::new("360p.mp4").with_options(OutputOptions {
        map: vec![MapOption::named("[v360]")],
        encoding: Some(EncodingOptions {
            bitrate: vec![StreamOption::for_stream(
                video(),
                Number::int(800).with_prefix(UnitPrefix::Kilo),
            )],
            codec: vec![StreamOption::for_stream(video(), "libx264".to_string())],
            remove_audio: true,
            ..EncodingOptions::default()
        }),
        format: None,
    });

    Job::new()
        .global(GlobalOptions {
            log: Some(LogOptions {
                level: Some(LogLevel::Error),
                ..LogOptions::default()
            }),
            overwrite: Some(true),
            no_stats: true,
            report: false,
        })
        .input(Input::new("in.mp4").with_options(InputOptions {
            decoding: Some(DecodingOptions {
                hardware_acceleration: Some("cuda".to_string()),
                hardware_acceleration_device: Some(0),
                position: Some("10".to_string()),
                ..DecodingOptions::default()
            }),
            format: None,
        }))
        .complex_filter(graph)
        .output(hd)
        .output(sd)
}

/// Write an executable shell script standing in for ffmpeg
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
