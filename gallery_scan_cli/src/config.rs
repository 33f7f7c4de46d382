use crate::error::suggest_similar;
use crate::paths;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use gallery_scan_core::{EntryOrder, RootFailurePolicy, ScanConfig, SubtreeErrorPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `GALLERY_SCAN_SCAN__ORDER=listing`
const ENV_PREFIX: &str = "GALLERY_SCAN_";

/// Every key `config get` and `config set` accept
pub const KNOWN_KEYS: &[&str] = &[
    "output.color_enabled",
    "output.default_format",
    "output.grid_columns",
    "output.progress_enabled",
    "scan.default_root",
    "scan.follow_links",
    "scan.max_concurrency",
    "scan.on_subtree_error",
    "scan.order",
    "scan.root_failure",
    "scan.timeout_seconds",
];

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub default_format: String,
    pub color_enabled: bool,
    pub progress_enabled: bool,
    pub grid_columns: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            color_enabled: true,
            progress_enabled: true,
            grid_columns: gallery_scan_core::GalleryLayout::DEFAULT_COLUMNS,
        }
    }
}

/// Scan settings given on the command line; `None` keeps the configured value
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOverrides {
    pub order: Option<EntryOrder>,
    pub on_subtree_error: Option<SubtreeErrorPolicy>,
    pub root_failure: Option<RootFailurePolicy>,
    pub follow_links: bool,
    pub max_concurrency: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub columns: Option<usize>,
    pub no_progress: bool,
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, overrides: &ScanOverrides) {
        if let Some(order) = overrides.order {
            self.scan.order = order;
        }
        if let Some(policy) = overrides.on_subtree_error {
            self.scan.on_subtree_error = policy;
        }
        if let Some(policy) = overrides.root_failure {
            self.scan.root_failure = policy;
        }
        if overrides.follow_links {
            self.scan.follow_links = true;
        }
        if let Some(limit) = overrides.max_concurrency {
            self.scan.max_concurrency = limit;
        }
        if let Some(seconds) = overrides.timeout_seconds {
            self.scan.timeout_seconds = Some(seconds);
        }
        if let Some(columns) = overrides.columns {
            self.output.grid_columns = columns;
        }
        if overrides.no_progress {
            self.output.progress_enabled = false;
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with the default configuration path
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    ///
    /// CLI flags are applied afterwards through [`AppConfig::apply_cli_overrides`].
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_path.display()
            )
        })
    }

    /// Get a configuration value by key (dot notation)
    ///
    /// Returns `None` for a known key that has no value, such as an unset
    /// `scan.timeout_seconds`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check_known_key(key)?;

        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => match table.get(part) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        match current {
            toml::Value::String(s) => Ok(Some(s.clone())),
            toml::Value::Integer(i) => Ok(Some(i.to_string())),
            toml::Value::Boolean(b) => Ok(Some(b.to_string())),
            _ => anyhow::bail!("Value at '{}' is not a simple type", key),
        }
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::check_known_key(key)?;
        let parsed_value = Self::parse_config_value(key, value)?;

        // Load existing config or create new
        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            toml::from_str(&content).with_context(|| {
                format!("Failed to parse {}", self.config_path.display())
            })?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        // Known keys are always `section.field`
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid key path: {}", key))?;

        let toml::Value::Table(root) = &mut config else {
            anyhow::bail!("Configuration file is not a table");
        };
        let table = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        let toml::Value::Table(table) = table else {
            anyhow::bail!("Invalid key path: expected table at '{}'", section);
        };
        table.insert(field.to_string(), parsed_value);

        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&self.config_path, toml_string)?;

        Ok(())
    }

    /// List all configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;

        let mut items = Vec::new();
        Self::collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    /// Recursively collect all key-value pairs from TOML
    fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let new_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::collect_values(val, new_prefix, items);
                }
            }
            toml::Value::String(s) => items.push((prefix, s.clone())),
            toml::Value::Integer(i) => items.push((prefix, i.to_string())),
            toml::Value::Boolean(b) => items.push((prefix, b.to_string())),
            _ => {}
        }
    }

    fn check_known_key(key: &str) -> Result<()> {
        if KNOWN_KEYS.contains(&key) {
            return Ok(());
        }

        match suggest_similar(key, KNOWN_KEYS).first() {
            Some(suggestion) => {
                anyhow::bail!("Unknown configuration key '{key}'. Did you mean '{suggestion}'?")
            }
            None => anyhow::bail!(
                "Unknown configuration key '{key}'. Run 'gallery-scan config list' to see valid keys"
            ),
        }
    }

    /// Validate a value and convert it to the TOML type stored for `key`
    fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
        let one_of = |allowed: &[&str]| -> Result<toml::Value> {
            if allowed.contains(&value) {
                Ok(toml::Value::String(value.to_string()))
            } else {
                anyhow::bail!("{key} must be one of: {}", allowed.join(", "))
            }
        };
        let positive = |name: &str| -> Result<toml::Value> {
            let number: i64 = value
                .parse()
                .with_context(|| format!("{name} must be a positive integer"))?;
            if number < 1 {
                anyhow::bail!("{name} must be at least 1");
            }
            Ok(toml::Value::Integer(number))
        };

        match key {
            "scan.order" => one_of(&["name", "listing"]),
            "scan.on_subtree_error" => one_of(&["ignore", "collect", "abort"]),
            "scan.root_failure" => one_of(&["empty", "fail"]),
            "output.default_format" => one_of(&["text", "json", "grid"]),
            "scan.max_concurrency" => positive("max_concurrency"),
            "scan.timeout_seconds" => positive("timeout_seconds"),
            "output.grid_columns" => positive("grid_columns"),
            "scan.follow_links" | "output.color_enabled" | "output.progress_enabled" => {
                let flag: bool = value.parse().context("Value must be 'true' or 'false'")?;
                Ok(toml::Value::Boolean(flag))
            }
            "scan.default_root" => {
                if value.is_empty() {
                    anyhow::bail!("default_root must not be empty");
                }
                Ok(toml::Value::String(value.to_string()))
            }
            _ => anyhow::bail!("Unknown configuration key '{key}'"),
        }
    }
}

/// Load the configuration from the default location
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}
