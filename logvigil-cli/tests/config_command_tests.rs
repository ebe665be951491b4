//! Integration tests for `logvigil config` command.
//!
//! Tests config validation and display functionality with real TOML files.

use std::fs;
use tempfile::TempDir;

#[test]
fn config_validate_accepts_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logvigil.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[http]
failure_status = 401
brute_force_threshold = 20
brute_force_window_mins = 5

[ssh]
failed_threshold = 10

[blacklist]
enabled = false
"#;

    fs::write(&config_path, valid_config).expect("should write config");

    // When: Loading the config
    let result = logvigil_core::config::VigilConfig::load(&config_path);

    // Then: Should succeed
    assert!(result.is_ok(), "valid config should load successfully");
}

#[test]
fn config_validate_rejects_malformed_toml() {
    // Given: A malformed TOML file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");

    let malformed_config = r#"
[general
log_level = "info"
"#;

    fs::write(&config_path, malformed_config).expect("should write bad config");

    // When: Loading the config
    let result = logvigil_core::config::VigilConfig::load(&config_path);

    // Then: Should fail
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[test]
fn config_validate_rejects_zero_threshold() {
    // Given: A config file with an invalid threshold
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logvigil.toml");

    let bad_threshold = r#"
[http]
brute_force_threshold = 0
"#;

    fs::write(&config_path, bad_threshold).expect("should write config");

    // When: Loading the config
    let result = logvigil_core::config::VigilConfig::load(&config_path);

    // Then: Validation should reject the zero threshold
    assert!(result.is_err(), "zero threshold should fail validation");
}

#[test]
fn config_load_missing_file_reports_path() {
    // Given: A path that does not exist
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("nope.toml");

    // When: Loading the config
    let err = logvigil_core::config::VigilConfig::load(&config_path)
        .expect_err("missing file should fail");

    // Then: The error message should name the missing file
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn analyze_pipeline_end_to_end() {
    // Given: An access log with a brute-force burst and a blacklist file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let access_log = temp_dir.path().join("access.log");
    let blacklist_path = temp_dir.path().join("blacklist.txt");

    let mut lines = String::new();
    for sec in 0..25 {
        lines.push_str(&format!(
            "5.6.7.8 - - [10/Oct/2025:13:55:{sec:02} +0000] \"POST /login HTTP/1.1\" 401 512 \"-\" \"curl/8.0\"\n"
        ));
    }
    fs::write(&access_log, lines).expect("should write access log");
    fs::write(&blacklist_path, "5.6.7.8\n").expect("should write blacklist");

    let mut config = logvigil_core::config::VigilConfig::default();
    config.http.brute_force_threshold = 20;

    // When: Running the full parse -> detect -> enrich pipeline
    let events = logvigil_parser::apache::parse_file(&access_log).expect("should parse log");
    let blacklist =
        logvigil_analyzer::Blacklist::load(&blacklist_path).expect("should load blacklist");
    let engine =
        logvigil_analyzer::AnalysisEngine::from_config(&config).expect("should build engine");
    let incidents = engine.run(&events, &[], &blacklist);

    // Then: One blacklisted brute-force incident
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].source_key, "5.6.7.8");
    assert!(incidents[0].blacklisted);
}
