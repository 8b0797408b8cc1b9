//! Integration tests for config load/save.

use sop_search_client::{config, Config, Domain};
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn load_existing_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
server:
  base_url: "http://search.internal:8080"
  timeout_secs: 15
search:
  default_domain: "support"
  suggestions:
    - "How do I reset a password?"
    - "What is the sterilization procedure?"
"#,
    )
    .unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.base_url(), "http://search.internal:8080");
    assert_eq!(cfg.timeout(), Some(Duration::from_secs(15)));
    assert_eq!(cfg.default_domain(), Domain::Support);
    assert_eq!(
        cfg.search.suggestions,
        vec![
            "How do I reset a password?",
            "What is the sterilization procedure?"
        ]
    );
}

#[test]
fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "{}\n").unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.base_url(), config::DEFAULT_BASE_URL);
    assert_eq!(cfg.timeout(), None);
    assert_eq!(cfg.default_domain(), Domain::Sop);
    assert!(cfg.search.suggestions.is_empty());
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    let err = config::load_or_default(Some(&missing)).unwrap_err();
    assert!(matches!(err, config::ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn malformed_yaml_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "server: [unclosed\n").unwrap();
    let err = config::load(&config_path).unwrap_err();
    assert!(matches!(err, config::ConfigError::Yaml { .. }));
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("sop-assistant");
    let config_path = config_dir.join("config.yaml");
    assert!(!config_dir.exists(), "config dir should not exist yet");

    let mut config = Config::default();
    config.server.base_url = Some("http://localhost:5000".into());
    config.search.default_domain = Some("sop".into());
    config.search.suggestions = vec!["Where are the gloves?".into()];

    config::save(&config_path, &config).expect("save should succeed");
    let pred = predicates::path::exists();
    assert!(pred.eval(&config_path), "config file should exist after save");

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(predicates::str::contains("base_url").eval(&contents));
    assert!(predicates::str::contains("suggestions").eval(&contents));
    // Unset optional fields stay out of the file.
    assert!(predicates::str::contains("timeout_secs").not().eval(&contents));

    let reloaded = config::load(&config_path).expect("reload should succeed");
    assert_eq!(reloaded.server.base_url, config.server.base_url);
    assert_eq!(reloaded.search.suggestions, config.search.suggestions);
}

/// Config path resolves to `~/.sop-assistant/config.yaml` using the platform home dir.
#[test]
fn default_config_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap().to_string();

    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, &home);
    let path = config::default_config_path();
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a config path");
    let expected = dir.path().join(".sop-assistant").join("config.yaml");
    assert_eq!(path, expected);
}
