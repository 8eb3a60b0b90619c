use giftwrap_core::config::{
    DEFAULT_CARRIER_MARKER, PRODUCTION_GIFT_MERCHANDISE_ID, STAGING_GIFT_MERCHANDISE_ID,
};
use giftwrap_core::{ConfigError, GiftOptionConfig};
use std::error::Error;
use std::io::{ErrorKind, Write};
use std::time::Duration;

#[test]
fn empty_document_yields_production_preset() {
    let config = GiftOptionConfig::from_json_str("{}").expect("empty document is valid");
    assert_eq!(config, GiftOptionConfig::production());
    assert_eq!(
        config.gift_merchandise_id.as_str(),
        PRODUCTION_GIFT_MERCHANDISE_ID
    );
}

#[test]
fn environment_preset_with_overrides() {
    let config = GiftOptionConfig::from_json_str(
        r#"{"environment": "staging", "observation_window_ms": 1500}"#,
    )
    .expect("staging document is valid");

    assert_eq!(config.gift_merchandise_id.as_str(), STAGING_GIFT_MERCHANDISE_ID);
    assert_eq!(config.observation_window, Duration::from_millis(1_500));
    assert_eq!(config.carrier_marker, DEFAULT_CARRIER_MARKER);
}

#[test]
fn rejects_unknown_fields_and_oversized_window() {
    let err = GiftOptionConfig::from_json_str(r#"{"window": 10}"#)
        .expect_err("unknown field must fail");
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = GiftOptionConfig::from_json_str(r#"{"observation_window_ms": 600000}"#)
        .expect_err("window above cap must fail");
    assert!(matches!(err, ConfigError::InvalidObservationWindow(600_000)));
}

#[test]
fn loads_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    write!(
        file,
        r#"{{"environment": "production", "carrier_marker": "Nekopos"}}"#
    )
    .expect("write temp config");

    let config = GiftOptionConfig::load_from_path(file.path()).expect("load config");
    assert_eq!(config.carrier_marker, "Nekopos");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.json");
    let err = GiftOptionConfig::load_from_path(&path).expect_err("missing file must fail");
    assert!(err.to_string().contains("absent.json"));

    let source = err
        .source()
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .expect("io error kept as source");
    assert_eq!(source.kind(), ErrorKind::NotFound);
}

#[test]
fn parse_error_keeps_json_source() {
    let err = GiftOptionConfig::from_json_str("{").expect_err("truncated json must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err
        .source()
        .and_then(|source| source.downcast_ref::<serde_json::Error>())
        .is_some());
}
