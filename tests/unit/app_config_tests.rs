/*!
 * Tests for application configuration loading and validation
 */

use floraqa::app_config::{Config, CriticalPassPolicy, LogLevel};

#[test]
fn test_defaultConfig_shouldPinEnglishToChinese() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withIso6392Codes_shouldAccept() {
    let config = Config {
        source_language: "eng".to_string(),
        target_language: "zho".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());

    // the bibliographic Chinese code normalizes too
    let config = Config {
        target_language: "chi".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withSwappedLanguages_shouldFail() {
    let config = Config {
        source_language: "zh".to_string(),
        target_language: "en".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_configJson_withUnknownPolicy_shouldFailToParse() {
    let json = r#"{"checks": {"critical_pass_policy": "bogus"}}"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn test_configJson_shouldParsePolicyAndLogLevel() {
    let json = r#"{
        "checks": {"critical_pass_policy": "count_no_critical_as_pass"},
        "log_level": "trace"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(
        config.checks.critical_pass_policy,
        CriticalPassPolicy::CountNoCriticalAsPass
    );
    assert_eq!(config.log_level, LogLevel::Trace);
}

#[test]
fn test_configJson_customUnitMap_shouldReplaceDefaults() {
    let json = r#"{"checks": {"unit_map": {"ft": ["英尺"]}}}"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert!(config.checks.unit_map.contains_key("ft"));
    assert!(!config.checks.unit_map.contains_key("cm"));
}

#[test]
fn test_defaultConfig_roundTrip_shouldBeStable() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let reparsed: Config = serde_json::from_str(&json).unwrap();
    let json_again = serde_json::to_string_pretty(&reparsed).unwrap();

    assert_eq!(json, json_again);
}
