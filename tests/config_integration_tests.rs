//! Integration tests for config loading from fixture files.
//!
//! These tests verify that the sort config can be parsed from the sample config file.

use std::fs;
use std::path::{Path, PathBuf};

use media_sorter::media_sort::{Category, CategorySet, MsortConfig, SortConfig};

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn msort_section_has_expected_keys() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let msort = value.get("msort").expect("should have msort section");
    for key in [
        "video",
        "image",
        "document",
        "auto",
        "debug",
        "dryrun",
        "log",
        "preview",
        "verbose",
        "native_library",
    ] {
        assert!(msort.get(key).is_some(), "[msort] should have key {key}");
    }
}

#[test]
fn msort_config_parses_sample() {
    let config = MsortConfig::from_toml_str(&read_sample_config()).expect("should parse sample config");

    assert!(config.video);
    assert!(config.image);
    assert!(!config.document);
    assert!(!config.auto);
    assert!(config.log);
    assert!(config.preview);
    assert_eq!(
        config.native_library,
        Some(PathBuf::from("/usr/local/lib/libtitle_cleaner.so"))
    );
}

#[test]
fn sort_config_from_sample_uses_enabled_types() {
    let user_config = MsortConfig::from_toml_str(&read_sample_config()).expect("should parse sample config");
    let config = SortConfig::from_user_config(PathBuf::from("/media"), user_config, &[], None)
        .expect("should create sort config");

    assert_eq!(config.enabled, CategorySet::from([Category::Video, Category::Image]));
    assert!(config.log);
    assert!(!config.dryrun);
}

#[test]
fn sort_config_from_sample_with_cli_type() {
    let user_config = MsortConfig::from_toml_str(&read_sample_config()).expect("should parse sample config");
    let config = SortConfig::from_user_config(PathBuf::from("/media"), user_config, &[Category::Document], None)
        .expect("should create sort config");

    assert_eq!(config.enabled, CategorySet::from([Category::Document]));
}

#[test]
fn unknown_keys_are_ignored() {
    let toml = r"
[msort]
video = false
unknown_option = 42
";
    let config = MsortConfig::from_toml_str(toml).expect("should parse config with unknown keys");
    assert!(!config.video);
}

#[test]
fn wrong_value_type_is_error() {
    let toml = r#"
[msort]
auto = "yes"
"#;
    assert!(MsortConfig::from_toml_str(toml).is_err());
}
