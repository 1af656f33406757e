use jsontree::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.indent_size, 2);
    assert!(!config.create_backup);
    assert!(!config.compress_output);
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
        indent_size: 4,
        create_backup: true,
        compress_output: false,
        log_level: "jsontree=debug".to_string(),
    };

    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(Config::load_from(&dir.path().join("none.toml")), Config::default());
}

#[test]
fn test_invalid_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "indent_size = \"wide\"").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/jsontree/config.toml"));
    }
}
