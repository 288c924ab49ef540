//! Integration tests for logging functionality
//!
//! Installing a subscriber is process-wide, so everything that initializes
//! logging lives in a single test.

use nova_intake::config::LoggingConfig;
use nova_intake::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/nova-intake");
}

#[test]
fn test_invalid_level_rejected_before_install() {
    let result = init_logging("chatty", &LoggingConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_file_logging_writes_json_lines() {
    // Default directives only cover the library's own targets
    std::env::set_var("RUST_LOG", "info");

    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).expect("first initialization succeeds");
    assert!(log_path.is_dir());

    tracing::info!(client_id = "c1", points = 10, "Upload credited to engagement ledger");
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join("nova-intake.log")).unwrap();
    let line = contents
        .lines()
        .find(|line| line.contains("Upload credited"))
        .expect("event written to log file");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["fields"]["client_id"], "c1");
    assert_eq!(event["level"], "INFO");

    // A second global subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::default()).is_err());
}
