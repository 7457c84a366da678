use std::time::Duration;

use serial_test::serial;
use temp_env::with_vars;

use super::*;
use crate::Error;

fn cleanup_all_dcache_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DCACHE__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = ClientConfig::default();

    assert_eq!(config.max_key_size, 250);
    assert_eq!(config.max_value_size, 1 << 20);
    assert_eq!(config.default_expiration_secs, 0);
    assert_eq!(config.default_expiration(), None);
    assert!(config.enable_metrics);
}

#[test]
#[serial]
fn new_should_match_defaults_without_overrides() {
    cleanup_all_dcache_env_vars();
    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let config = ClientConfig::new().unwrap();
        assert_eq!(config, ClientConfig::default());
    });
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_dcache_env_vars();
    with_vars(
        vec![
            ("DCACHE__MAX_VALUE_SIZE", Some("4096")),
            ("DCACHE__ENABLE_METRICS", Some("false")),
        ],
        || {
            let config = ClientConfig::new().unwrap();

            assert_eq!(config.max_value_size, 4096);
            assert!(!config.enable_metrics);
            assert_eq!(config.max_key_size, 250);
        },
    );
}

#[test]
#[serial]
fn new_should_load_file_from_config_path() {
    cleanup_all_dcache_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("client.toml");
    std::fs::write(
        &config_path,
        r#"
        max_key_size = 128
        default_expiration_secs = 600
        "#,
    )
    .unwrap();

    with_vars(
        vec![("CONFIG_PATH", Some(config_path.to_str().unwrap()))],
        || {
            let config = ClientConfig::new().unwrap().validate().unwrap();

            assert_eq!(config.max_key_size, 128);
            assert_eq!(config.default_expiration(), Some(Duration::from_secs(600)));
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_dcache_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(
        &config_path,
        r#"
        max_value_size = 2048 # Override default value
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = ClientConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .expect("override should load");

        assert_eq!(config.max_value_size, 2048);
        assert_eq!(config.max_key_size, 250);
    });
}

#[test]
fn validation_should_fail_with_zero_sizes() {
    let config = ClientConfig {
        max_key_size: 0,
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let config = ClientConfig {
        max_value_size: 0,
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn validation_should_fail_with_default_expiration_over_thirty_days() {
    let thirty_days = 30 * 24 * 60 * 60;
    let config = ClientConfig {
        default_expiration_secs: thirty_days,
        ..ClientConfig::default()
    };
    assert!(config.validate().is_ok());

    let config = ClientConfig {
        default_expiration_secs: thirty_days + 1,
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}
