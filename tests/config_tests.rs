use portal_core::config::{Config, ConfigManager};
use portal_core::ui::layout::ViewportClass;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    assert_eq!(manager.load().unwrap(), Config::default());
    assert!(!manager.path().exists());
}

#[test]
fn save_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let mut config = Config::default();
    config.set("mobile_breakpoint", "100").unwrap();
    config.set("theme", "high-contrast").unwrap();
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded.mobile_breakpoint, 100);
    assert_eq!(loaded.theme.as_deref(), Some("high-contrast"));
    assert_eq!(loaded.viewport(90), ViewportClass::Compact);
}

#[test]
fn partial_files_fill_in_defaults() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(manager.path(), r#"{ "page_size": 50 }"#).unwrap();
    let loaded = manager.load().unwrap();
    assert_eq!(loaded.page_size, 50);
    assert_eq!(loaded.locale, "en-US");
}

#[test]
fn malformed_files_surface_an_error() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(manager.path(), "{ not json").unwrap();
    let err = manager.load().unwrap_err();
    assert!(err.to_string().starts_with("Serialization error"));
}
