//! Layered configuration for adctl.
//!
//! Values come from `adctl.toml`, then environment variables, then CLI
//! flags, each layer overriding the one before.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! url = "http://localhost:8000"
//! timeout_secs = 30
//!
//! [bulk]
//! delay_ms = 500
//! duplicate_delay_ms = 300
//! min_selection = 2
//! reconcile_on_failure = false
//!
//! [logging]
//! dir = "/var/log/adctl"
//! ```
//!
//! The file is looked up at `--config`, then `$ADCTL_CONFIG`, then
//! `<config_dir>/adctl/adctl.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::client::DEFAULT_BACKEND_URL;
use crate::board::ControllerSettings;

/// Environment variables consulted for the backend URL, highest priority first.
pub const BACKEND_URL_VARS: [&str; 3] = [
    "ADCTL_BACKEND_URL",
    "BACKEND_API_URL",
    "NEXT_PUBLIC_BACKEND_URL",
];

pub const CONFIG_FILE_NAME: &str = "adctl.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Client-wide request timeout. Absent means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSection {
    /// Gap between bulk pause/activate/archive requests.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Gap between duplicate requests.
    #[serde(default = "default_duplicate_delay_ms")]
    pub duplicate_delay_ms: u64,
    #[serde(default = "default_min_selection")]
    pub min_selection: usize,
    #[serde(default)]
    pub reconcile_on_failure: bool,
}

fn default_delay_ms() -> u64 {
    500
}

fn default_duplicate_delay_ms() -> u64 {
    300
}

fn default_min_selection() -> usize {
    2
}

impl Default for BulkSection {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            duplicate_delay_ms: default_duplicate_delay_ms(),
            min_selection: default_min_selection(),
            reconcile_on_failure: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Directory for the daily rolling log file. Stderr only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// The complete adctl.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdctlToml {
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub bulk: BulkSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AdctlToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse adctl.toml")
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize adctl.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Return warnings for values that parse but make no sense.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !is_http_url(&self.backend.url) {
            warnings.push(format!(
                "Invalid backend url '{}': must start with http:// or https://",
                self.backend.url
            ));
        }
        if self.backend.timeout_secs == Some(0) {
            warnings.push("backend.timeout_secs = 0 makes every request time out".to_string());
        }
        if self.bulk.delay_ms == 0 {
            warnings.push(
                "bulk.delay_ms = 0 sends bulk requests back to back and may hit Meta rate limits"
                    .to_string(),
            );
        }
        if self.bulk.duplicate_delay_ms == 0 {
            warnings.push(
                "bulk.duplicate_delay_ms = 0 sends duplicate requests back to back".to_string(),
            );
        }
        if self.bulk.min_selection < 1 {
            warnings.push("bulk.min_selection must be at least 1".to_string());
        }

        warnings
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Flags from the command line that override file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub backend_url: Option<String>,
    pub account: Option<String>,
    pub verbose: bool,
    pub yes: bool,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub toml: AdctlToml,
    pub backend_url: String,
    pub data_dir: PathBuf,
    /// Account forced on the command line. Not persisted.
    pub account_override: Option<String>,
    pub verbose: bool,
    pub yes: bool,
}

impl Config {
    /// Resolve configuration from CLI flags, the process environment and the
    /// config file.
    pub fn load(cli: CliOverrides) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolution with an injectable environment lookup.
    pub fn resolve(cli: CliOverrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = cli
            .config_path
            .or_else(|| env("ADCTL_CONFIG").map(PathBuf::from))
            .unwrap_or_else(default_config_path);
        let toml = AdctlToml::load_or_default(&config_path)?;

        let backend_url = cli
            .backend_url
            .or_else(|| {
                BACKEND_URL_VARS
                    .iter()
                    .copied()
                    .find_map(|key| env(key).filter(|v| !v.trim().is_empty()))
            })
            .unwrap_or_else(|| toml.backend.url.clone());

        let data_dir = env("ADCTL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Ok(Self {
            config_path,
            toml,
            backend_url,
            data_dir,
            account_override: cli.account,
            verbose: cli.verbose,
            yes: cli.yes,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.toml.backend.timeout_secs.map(Duration::from_secs)
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.toml.logging.dir.as_deref()
    }

    pub fn controller_settings(&self, include_archived: bool) -> ControllerSettings {
        ControllerSettings {
            bulk_delay: Duration::from_millis(self.toml.bulk.delay_ms),
            duplicate_delay: Duration::from_millis(self.toml.bulk.duplicate_delay_ms),
            min_selection: self.toml.bulk.min_selection.max(1),
            reconcile_on_failure: self.toml.bulk.reconcile_on_failure,
            include_archived,
        }
    }

    /// File warnings plus a check of the effective backend URL.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.toml.validate();
        if self.backend_url != self.toml.backend.url && !is_http_url(&self.backend_url) {
            warnings.push(format!(
                "Invalid backend url override '{}': must start with http:// or https://",
                self.backend_url
            ));
        }
        warnings
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("adctl")
        .join(CONFIG_FILE_NAME)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("adctl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn cli_with_config(path: &Path) -> CliOverrides {
        CliOverrides {
            config_path: Some(path.to_path_buf()),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let toml = AdctlToml::parse("").unwrap();
        assert_eq!(toml.backend.url, "http://localhost:8000");
        assert_eq!(toml.backend.timeout_secs, None);
        assert_eq!(toml.bulk.delay_ms, 500);
        assert_eq!(toml.bulk.duplicate_delay_ms, 300);
        assert_eq!(toml.bulk.min_selection, 2);
        assert!(!toml.bulk.reconcile_on_failure);
        assert!(toml.logging.dir.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
[backend]
url = "https://ads.example.com"
timeout_secs = 20

[bulk]
delay_ms = 750
duplicate_delay_ms = 400
min_selection = 3
reconcile_on_failure = true

[logging]
dir = "/tmp/adctl-logs"
"#;
        let toml = AdctlToml::parse(content).unwrap();
        assert_eq!(toml.backend.url, "https://ads.example.com");
        assert_eq!(toml.backend.timeout_secs, Some(20));
        assert_eq!(toml.bulk.delay_ms, 750);
        assert_eq!(toml.bulk.duplicate_delay_ms, 400);
        assert_eq!(toml.bulk.min_selection, 3);
        assert!(toml.bulk.reconcile_on_failure);
        assert_eq!(toml.logging.dir, Some(PathBuf::from("/tmp/adctl-logs")));
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(AdctlToml::parse("[bulk\ndelay_ms = ").is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut toml = AdctlToml::default();
        toml.bulk.delay_ms = 900;
        toml.save(&path).unwrap();

        let loaded = AdctlToml::load(&path).unwrap();
        assert_eq!(loaded.bulk.delay_ms, 900);
        assert_eq!(loaded.backend.url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut toml = AdctlToml::default();
        assert!(toml.validate().is_empty());

        toml.backend.url = "localhost:8000".into();
        toml.bulk.delay_ms = 0;
        toml.bulk.min_selection = 0;
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("backend url")));
        assert!(warnings.iter().any(|w| w.contains("delay_ms = 0")));
        assert!(warnings.iter().any(|w| w.contains("min_selection")));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(
            cli_with_config(&dir.path().join("absent.toml")),
            env_of(&[]),
        )
        .unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_backend_url_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[backend]\nurl = \"http://file:1\"\n").unwrap();

        let from_file = Config::resolve(cli_with_config(&path), env_of(&[])).unwrap();
        assert_eq!(from_file.backend_url, "http://file:1");

        let from_env = Config::resolve(
            cli_with_config(&path),
            env_of(&[
                ("NEXT_PUBLIC_BACKEND_URL", "http://next:3"),
                ("BACKEND_API_URL", "http://api:2"),
            ]),
        )
        .unwrap();
        assert_eq!(from_env.backend_url, "http://api:2");

        let from_cli = Config::resolve(
            CliOverrides {
                backend_url: Some("http://cli:4".into()),
                ..cli_with_config(&path)
            },
            env_of(&[("ADCTL_BACKEND_URL", "http://env:5")]),
        )
        .unwrap();
        assert_eq!(from_cli.backend_url, "http://cli:4");
    }

    #[test]
    fn test_config_path_from_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[bulk]\nmin_selection = 4\n").unwrap();

        let config = Config::resolve(
            CliOverrides::default(),
            env_of(&[("ADCTL_CONFIG", path.to_str().unwrap())]),
        )
        .unwrap();
        assert_eq!(config.config_path, path);
        assert_eq!(config.controller_settings(false).min_selection, 4);
    }

    #[test]
    fn test_controller_settings_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[bulk]\ndelay_ms = 100\nduplicate_delay_ms = 50\nreconcile_on_failure = true\n",
        )
        .unwrap();

        let config = Config::resolve(cli_with_config(&path), env_of(&[])).unwrap();
        let settings = config.controller_settings(true);
        assert_eq!(settings.bulk_delay, Duration::from_millis(100));
        assert_eq!(settings.duplicate_delay, Duration::from_millis(50));
        assert!(settings.reconcile_on_failure);
        assert!(settings.include_archived);
    }

    #[test]
    fn test_data_dir_override() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(
            cli_with_config(&dir.path().join("absent.toml")),
            env_of(&[("ADCTL_DATA_DIR", "/tmp/adctl-data")]),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/adctl-data"));
    }
}
