//! Configuration file location for the gallery-scan CLI

use std::env;
use std::path::PathBuf;

/// Directory name used under the platform config home
const APP_CONFIG_DIR: &str = "gallery-scan";

/// Name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Returns the configuration directory
///
/// `$XDG_CONFIG_HOME/gallery-scan` when the variable is set and non-empty,
/// otherwise the platform config directory:
/// - `~/.config/gallery-scan` on Linux
/// - `~/Library/Application Support/gallery-scan` on macOS
/// - `%APPDATA%/gallery-scan` on Windows
///
/// Falls back to `.gallery-scan` in the current directory when no home can
/// be determined.
pub fn get_config_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        return PathBuf::from(xdg).join(APP_CONFIG_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_CONFIG_DIR))
        .unwrap_or_else(|| PathBuf::from(".gallery-scan"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}
