// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use std::io::Write;

#[test]
fn empty_config_uses_defaults() {
    let config = RunnerConfig::parse("").unwrap();
    assert_eq!(config.queue.poll_interval(), Duration::from_millis(10));
    assert_eq!(config.waits_for.timeout(), Duration::from_millis(5000));
    assert_eq!(config.report.format, OutputFormat::Text);
    assert_eq!(config.report.color, ColorMode::Auto);
}

#[test]
fn sections_override_defaults_independently() {
    let config = RunnerConfig::parse(
        r#"
[queue]
poll_interval_ms = 25

[report]
format = "json"
color = "never"
"#,
    )
    .unwrap();
    assert_eq!(config.queue.poll_interval_ms, 25);
    assert_eq!(config.waits_for.timeout_ms, 5000);
    assert_eq!(config.report.format, OutputFormat::Json);
    assert_eq!(config.report.color, ColorMode::Never);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = RunnerConfig::parse("[queue]\nspeed = 3\n").unwrap_err();
    assert!(format!("{err:#}").contains("unknown field"));
}

#[test]
fn invalid_format_is_rejected() {
    assert!(RunnerConfig::parse("[report]\nformat = \"xml\"\n").is_err());
}

#[test]
fn load_reads_file_and_names_it_in_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[waits_for]\ntimeout_ms = 250").unwrap();
    let config = RunnerConfig::load(file.path()).unwrap();
    assert_eq!(config.waits_for.timeout(), Duration::from_millis(250));

    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("specrun.toml");
    let err = RunnerConfig::load(&missing).unwrap_err();
    assert!(err.to_string().contains("specrun.toml"));
}
