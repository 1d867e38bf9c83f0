//! Integration tests for Settings layered loading.
//!
//! Precedence (lowest to highest): defaults, global file, local file, env vars.
//! The environment layer is fed from an explicit map so tests never touch the
//! process environment.

use std::fs;

use config::{Environment, Map};
use tempfile::TempDir;

use genealogy::config::{env_source, local_config_path};
use genealogy::util::testing::{init_test_setup, Virus};
use genealogy::{EmptyParentsPolicy, Genealogy, GenealogyError, Settings, SettingsError};

fn env_with(vars: &[(&str, &str)]) -> Environment {
    let map: Map<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env_source().source(Some(map))
}

#[test]
fn given_no_sources_when_load_then_defaults() {
    // Arrange
    init_test_setup();
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load_with(None, Some(dir.path()), env_with(&[])).unwrap();

    // Assert
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.empty_parents, EmptyParentsPolicy::Reject);
}

#[test]
fn given_global_config_when_load_then_global_applies() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("genealogy.toml");
    fs::write(&global, "empty_parents = \"ignore\"\n").unwrap();

    // Act
    let settings = Settings::load_with(Some(global.as_path()), None, env_with(&[])).unwrap();

    // Assert
    assert_eq!(settings.empty_parents, EmptyParentsPolicy::Ignore);
}

#[test]
fn given_local_config_when_load_then_local_overrides_global() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("genealogy.toml");
    fs::write(&global, "empty_parents = \"ignore\"\n").unwrap();

    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "empty_parents = \"reject\"\n").unwrap();

    // Act
    let settings = Settings::load_with(Some(global.as_path()), Some(local_dir.path()), env_with(&[])).unwrap();

    // Assert
    assert_eq!(settings.empty_parents, EmptyParentsPolicy::Reject);
}

#[test]
fn given_local_config_without_key_when_load_then_global_value_kept() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("genealogy.toml");
    fs::write(&global, "empty_parents = \"ignore\"\n").unwrap();

    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "# nothing here\n").unwrap();

    // Act
    let settings = Settings::load_with(Some(global.as_path()), Some(local_dir.path()), env_with(&[])).unwrap();

    // Assert
    assert_eq!(settings.empty_parents, EmptyParentsPolicy::Ignore);
}

#[test]
fn given_env_override_when_load_then_env_wins() {
    // Arrange
    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "empty_parents = \"reject\"\n").unwrap();

    // Act
    let settings = Settings::load_with(
        None,
        Some(local_dir.path()),
        env_with(&[("GENEALOGY_EMPTY_PARENTS", "ignore")]),
    )
    .unwrap();

    // Assert
    assert_eq!(settings.empty_parents, EmptyParentsPolicy::Ignore);
}

#[test]
fn given_invalid_env_value_when_load_then_errors() {
    let result = Settings::load_with(None, None, env_with(&[("GENEALOGY_EMPTY_PARENTS", "sometimes")]));
    assert!(matches!(result, Err(SettingsError::InvalidPolicy(ref v)) if v == "sometimes"));
}

#[test]
fn given_malformed_local_config_when_load_then_parse_error() {
    // Arrange
    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "empty_parents = \"never\"\n").unwrap();

    // Act
    let result = Settings::load_with(None, Some(local_dir.path()), env_with(&[]));

    // Assert
    assert!(matches!(result, Err(SettingsError::Parse { .. })));
}

#[test]
fn given_loaded_ignore_policy_when_creating_without_parents_then_noop() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "empty_parents = \"ignore\"\n").unwrap();
    let settings = Settings::load_with(None, Some(dir.path()), env_with(&[])).unwrap();
    let mut gen: Genealogy<Virus> = Genealogy::with_settings("S".to_string(), settings).unwrap();

    // Act
    let ignored = gen.create_with_parents("X".to_string(), &[]);

    // Assert
    assert!(ignored.is_ok());
    assert!(!gen.exists(&"X".to_string()));
    assert_eq!(gen.node_count(), 1);
}

#[test]
fn given_default_settings_when_creating_without_parents_then_rejected() {
    let mut gen: Genealogy<Virus> = Genealogy::new("S".to_string()).unwrap();
    let result = gen.create_with_parents("X".to_string(), &[]);
    assert!(matches!(result, Err(GenealogyError::EmptyParents(ref id)) if id == "X"));
}
