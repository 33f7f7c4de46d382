//! Layered configuration tests: defaults < file < environment

use gallery_scan_cli::config::ConfigManager;
use gallery_scan_core::{EntryOrder, RootFailurePolicy, SubtreeErrorPolicy};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn create_test_config_manager(temp_dir: &TempDir) -> ConfigManager {
    ConfigManager::with_path(temp_dir.path().join("config.toml"))
}

/// Sets an environment variable for the lifetime of the guard
struct EnvGuard(&'static str);

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            std::env::set_var(key, value);
        }
        Self(key)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(self.0);
        }
    }
}

#[test]
#[serial]
fn test_file_values_are_loaded() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
[scan]
order = "listing"
on_subtree_error = "abort"
root_failure = "fail"
timeout_seconds = 30

[output]
grid_columns = 6
"#,
    )
    .unwrap();

    let config = create_test_config_manager(&temp_dir).load().unwrap();
    assert_eq!(config.scan.order, EntryOrder::Listing);
    assert_eq!(config.scan.on_subtree_error, SubtreeErrorPolicy::Abort);
    assert_eq!(config.scan.root_failure, RootFailurePolicy::Fail);
    assert_eq!(config.scan.timeout_seconds, Some(30));
    assert_eq!(config.scan.max_concurrency, 1);
    assert_eq!(config.output.grid_columns, 6);
    assert_eq!(config.output.default_format, "text");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);
    manager.set("scan.max_concurrency", "2").unwrap();

    let _guard = EnvGuard::set("GALLERY_SCAN_SCAN__MAX_CONCURRENCY", "6");
    let config = manager.load().unwrap();
    assert_eq!(config.scan.max_concurrency, 6);
    assert_eq!(manager.get("scan.max_concurrency").unwrap().as_deref(), Some("6"));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[scan]\norder = \"sideways\"\n",
    )
    .unwrap();

    let err = create_test_config_manager(&temp_dir).load().unwrap_err();
    assert!(err.to_string().contains("Failed to load configuration"));
}

#[test]
#[serial]
fn test_set_preserves_other_keys() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    manager.set("scan.follow_links", "true").unwrap();
    manager.set("scan.default_root", "/sdcard/Pictures/Screenshots").unwrap();
    manager.set("output.color_enabled", "false").unwrap();

    let content = fs::read_to_string(manager.get_config_path()).unwrap();
    assert!(content.contains("follow_links = true"));
    assert!(content.contains("color_enabled = false"));

    let config = manager.load().unwrap();
    assert!(config.scan.follow_links);
    assert_eq!(
        config.scan.default_root.as_deref(),
        Some(std::path::Path::new("/sdcard/Pictures/Screenshots"))
    );
    assert!(!config.output.color_enabled);
}

#[test]
#[serial]
fn test_list_is_sorted_and_complete() {
    let temp_dir = TempDir::new().unwrap();
    let items = create_test_config_manager(&temp_dir).list().unwrap();

    let keys: Vec<&str> = items.iter().map(|(key, _)| key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&"scan.order"));
    assert!(keys.contains(&"output.progress_enabled"));
    // Unset optional values are not listed
    assert!(!keys.contains(&"scan.timeout_seconds"));
}
