// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

// A global subscriber can be installed once per process, so this file holds
// a single test.

use mock_stream_logging::{CliLogLevel, CliLoggingArgs, LogFormat};

#[test]
fn json_file_logging_writes_structured_lines() {
    let dir = tempfile::tempdir().unwrap();
    let args = CliLoggingArgs {
        log_level: Some(CliLogLevel::Debug),
        log_format: Some(LogFormat::Json),
        log_dir: Some(dir.path().join("nested").to_string_lossy().into_owned()),
        log_file: None,
    };
    let path = args.resolve_log_path("file-logging").unwrap();

    args.init("file-logging").unwrap();
    tracing::error!(chunks = 3, "stream aborted");

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents
        .lines()
        .find(|line| line.contains("stream aborted"))
        .expect("log line present");
    let record: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["fields"]["chunks"], 3);

    // A second global init is refused rather than silently replacing the first
    assert!(mock_stream_logging::init(
        "file-logging",
        mock_stream_logging::Level::INFO,
        LogFormat::Plaintext
    )
    .is_err());
}
