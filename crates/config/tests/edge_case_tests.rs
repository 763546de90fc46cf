//! Edge case and error scenario tests

use audiostories_config::{Config, ConfigManager};
use std::fs;
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path());
    Ok((temp_dir, manager))
}

fn write_config(manager: &ConfigManager, contents: &str) -> std::io::Result<()> {
    let config_path = manager.path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, contents)
}

#[test]
fn test_corrupted_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    write_config(&manager, "this is not valid TOML {{{")?;

    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_empty_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    write_config(&manager, "")?;

    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().join("a").join("b"));

    manager.save(&Config::default())?;
    assert!(manager.path().exists());
    Ok(())
}

#[test]
fn test_concurrent_config_loads() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config_dir = temp_dir.path().to_path_buf();
    ConfigManager::with_directory(&config_dir).initialize()?;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dir = config_dir.clone();
            std::thread::spawn(move || {
                let manager = ConfigManager::with_directory(dir);
                for _ in 0..10 {
                    assert_eq!(manager.load().expect("load"), Config::default());
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }
    Ok(())
}

#[test]
fn test_boundary_values() {
    let mut config = Config::default();
    config.playback.default_speech_rate = 0.5;
    config.playback.words_per_minute = 400.0;
    config.backend.fetch_attempts = 1;
    config.backend.transaction_attempts = 25;
    assert!(config.validate().is_ok());

    config.playback.default_speech_rate = 0.49;
    config.backend.transaction_attempts = 26;
    assert_eq!(config.validate().unwrap_err().len(), 2);
}

#[test]
fn test_partial_config_toml() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    write_config(
        &manager,
        r#"
version = 1

[playback]
default_speech_rate = 1.5
"#,
    )?;

    let config = manager.load()?;
    assert_eq!(config.playback.default_speech_rate, 1.5);
    assert_eq!(config.playback.words_per_minute, 150.0);
    assert_eq!(config.backend.fetch_attempts, 3);
    Ok(())
}

#[test]
fn test_unknown_keys_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    write_config(&manager, "[player]\ndefault_volume = 80\n")?;

    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_update_with_invalid_value() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    let result = manager.update(|config| {
        config.playback.voice_marker = String::new();
    });
    assert!(result.is_err());

    assert_eq!(manager.load()?.playback.voice_marker, "network");
    Ok(())
}

#[test]
fn test_failed_save_keeps_previous_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut config = Config::default();
    config.backend.fetch_attempts = 4;
    manager.save(&config)?;
    let before = fs::read_to_string(manager.path())?;

    config.backend.fetch_attempts = 0;
    assert!(manager.save(&config).is_err());

    assert_eq!(fs::read_to_string(manager.path())?, before);
    assert_eq!(manager.load()?.backend.fetch_attempts, 4);
    Ok(())
}

#[test]
fn test_config_file_deleted_during_operation() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;
    fs::remove_file(manager.path())?;

    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}
