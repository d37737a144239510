/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use log::LevelFilter;
use srtq::app_config::{Config, LogLevel};
use srtq::errors::AppError;
use srtq::query::DEFAULT_TOLERANCE_MS;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.offset_ms, 0);
    assert_eq!(config.tolerance_ms, DEFAULT_TOLERANCE_MS);
    assert_eq!(config.prompt, "Input timestamp: ");
    assert!(!config.lenient);
    assert_eq!(config.log_level, LogLevel::Warn);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.tolerance_ms = 0;
    assert!(config.validate().is_ok());

    config.tolerance_ms = -1;
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    // Negative offsets are ordinary
    config.tolerance_ms = 1000;
    config.offset_ms = -30_000;
    assert!(config.validate().is_ok());
}

/// Fields missing from the file take their defaults
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "offset_ms": -750, "log_level": "debug" }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.offset_ms, -750);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.tolerance_ms, DEFAULT_TOLERANCE_MS);
    assert_eq!(config.prompt, "Input timestamp: ");
    Ok(())
}

#[test]
fn test_config_serialization_withDefaultConfig_shouldRoundTrip() -> Result<()> {
    let config = Config {
        lenient: true,
        prompt: "> ".to_string(),
        ..Config::default()
    };

    let json = serde_json::to_string_pretty(&config)?;
    let restored: Config = serde_json::from_str(&json)?;

    assert_eq!(restored, config);
    assert!(json.contains("\"log_level\": \"warn\""));
    Ok(())
}

#[test]
fn test_config_from_file_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = Config::from_file(temp_dir.path().join("missing.json"));

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to open config file"));
    Ok(())
}

#[test]
fn test_config_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{ "tolerance_ms": "wide" }"#)?;

    let message = format!("{:#}", Config::from_file(&path).unwrap_err());
    assert!(message.contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_log_level_to_level_filter_withEachLevel_shouldMapToFacade() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
