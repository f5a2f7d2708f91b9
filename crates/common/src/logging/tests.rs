//! Unit tests for the logging subsystem.

use std::path::PathBuf;

use tracing_subscriber::fmt::format::FmtSpan;

use super::{service::logger_config, types::*, *};

#[test]
fn test_format_service_name() {
    assert_eq!(format_service_name("poi-proposer", None), "poi-proposer");
    assert_eq!(
        format_service_name("poi-proposer", Some("prod")),
        "poi-proposer%prod"
    );
}

#[test]
fn test_logger_config_defaults() {
    let config = LoggerConfig::new("test-service".to_string());
    assert_eq!(config.service_name, "test-service");
    assert!(!config.stdout_config.json_format);
    assert!(config.file_logging_config.is_none());
}

#[test]
fn test_logger_config_builder_pattern() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LoggerConfig::new("test-service".to_string())
        .with_json_logging(true)
        .with_fmt_span(FmtSpan::NONE)
        .with_file_logging(
            FileLoggingConfig::new(dir.path().to_path_buf(), "poi".to_string())
                .with_rotation(Rotation::HOURLY)
                .with_json_format(true),
        );

    assert!(config.stdout_config.json_format);
    let file_config = config.file_logging_config.expect("file logging set");
    assert_eq!(file_config.directory, dir.path());
    assert_eq!(file_config.file_name_prefix, "poi");
    assert!(file_config.json_format);
}

#[test]
fn test_logger_config_from_init_config_uses_base_name_as_prefix() {
    let log_dir = PathBuf::from("/var/log/poi");
    let config = logger_config(&LoggingInitConfig {
        service_base_name: "poi-proposer",
        service_label: Some("dev"),
        log_dir: Some(&log_dir),
        log_file_prefix: None,
        json_format: None,
    });

    assert_eq!(config.service_name, "poi-proposer%dev");
    assert!(!config.stdout_config.json_format);
    let file_config = config.file_logging_config.expect("file logging set");
    assert_eq!(file_config.directory, log_dir);
    assert_eq!(file_config.file_name_prefix, "poi-proposer");
}

#[test]
fn test_logger_config_from_init_config_without_dir() {
    let config = logger_config(&LoggingInitConfig {
        service_base_name: "poi-proposer",
        service_label: None,
        log_dir: None,
        log_file_prefix: Some("ignored"),
        json_format: Some(true),
    });

    assert!(config.file_logging_config.is_none());
    assert!(config.stdout_config.json_format);
}
