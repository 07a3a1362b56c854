//! # terminus-config
//!
//! Configuration management for terminus.
//!
//! Loads configuration from:
//! 1. `~/.terminus/config.toml` (global)
//! 2. `.terminus/config.toml` (project-local, overrides global key by key)
//! 3. Environment variables (highest priority)

#[macro_use]
pub mod logging;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};
use terminus_core::TerminatorOptions;

pub use logging::{init_logging, LogLevel};

/// Project-local config path, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".terminus/config.toml";

/// Global config instance
static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new(Config::load().unwrap_or_else(|e| {
        let error = e.to_string();
        log_config_warn!("Falling back to default config", error = error.as_str());
        Config::default()
    }))
});

/// Get global config (read-only)
pub fn config() -> RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reload config from disk
pub fn reload() -> Result<(), ConfigError> {
    let new_config = Config::load()?;
    *CONFIG.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = new_config;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub termination: TerminationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let mut config = Self::load_from(global.as_deref(), Some(Path::new(PROJECT_CONFIG_PATH)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load and layer the given files. Missing files are skipped; the
    /// project file only overrides the keys it actually sets.
    pub fn load_from(global: Option<&Path>, project: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();

        for path in [global, project].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let path_display = path.to_string_lossy();
            log_config_debug!("Loading config file", path = &*path_display);
            let contents = std::fs::read_to_string(path)?;
            let layer: toml::Table = toml::from_str(&contents)?;
            merge_tables(&mut merged, layer);
        }

        Ok(Config::deserialize(toml::Value::Table(merged))?)
    }

    /// Global config path: ~/.terminus/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".terminus/config.toml"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored.
    pub fn apply_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TERMINUS_ECHO_STDERR").as_deref().and_then(parse_bool) {
            self.termination.echo_stderr = v;
        }
        if let Some(v) = lookup("TERMINUS_LOG_EVENT").as_deref().and_then(parse_bool) {
            self.termination.log_event = v;
        }
        if let Some(v) = lookup("TERMINUS_BACKTRACE").as_deref().and_then(parse_bool) {
            self.termination.capture_backtrace = v;
        }
        if let Some(level) = lookup("TERMINUS_LOG").as_deref().and_then(LogLevel::parse) {
            self.logging.level = level;
        }
    }

    /// Install the termination section as the process terminator's options.
    /// Only the first installation in a process takes effect.
    pub fn install(&self) -> bool {
        terminus_core::install_process_options(self.termination.to_options()).is_ok()
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        Config::default().to_toml()
    }

    pub fn to_toml(&self) -> String {
        // Plain structs of bools and enums always serialize.
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let incoming = match value {
            toml::Value::Table(incoming) => incoming,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// What the terminator does besides notifying and halting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationConfig {
    /// Echo the diagnostic line to stderr (default: debug builds only)
    pub echo_stderr: bool,
    /// Emit a structured error event before halting
    pub log_event: bool,
    /// Attach a backtrace to the log event
    pub capture_backtrace: bool,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        let defaults = TerminatorOptions::default();
        Self {
            echo_stderr: defaults.echo_stderr,
            log_event: defaults.log_event,
            capture_backtrace: defaults.capture_backtrace,
        }
    }
}

impl TerminationConfig {
    pub fn to_options(&self) -> TerminatorOptions {
        TerminatorOptions {
            echo_stderr: self.echo_stderr,
            log_event: self.log_event,
            capture_backtrace: self.capture_backtrace,
            ..TerminatorOptions::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.termination.log_event);
        assert!(!config.termination.capture_backtrace);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[termination]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("level = \"warn\""));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars = HashMap::from([
            ("TERMINUS_ECHO_STDERR", "off"),
            ("TERMINUS_BACKTRACE", "YES"),
            ("TERMINUS_LOG_EVENT", "maybe"),
            ("TERMINUS_LOG", "debug"),
        ]);
        let mut config = Config::default();
        config.apply_overrides_with(|k| vars.get(k).map(|v| v.to_string()));

        assert!(!config.termination.echo_stderr);
        assert!(config.termination.capture_backtrace);
        // unparseable value leaves the default in place
        assert!(config.termination.log_event);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_merge_tables_is_key_by_key() {
        let mut base: toml::Table =
            toml::from_str("[termination]\necho_stderr = true\nlog_event = false\n").unwrap();
        let overlay: toml::Table = toml::from_str("[termination]\nlog_event = true\n").unwrap();
        merge_tables(&mut base, overlay);

        let config = Config::deserialize(toml::Value::Table(base)).unwrap();
        assert!(config.termination.echo_stderr);
        assert!(config.termination.log_event);
    }

    #[test]
    fn test_to_options_keeps_hard_stop() {
        let cfg = TerminationConfig {
            echo_stderr: true,
            log_event: false,
            capture_backtrace: true,
        };
        let opts = cfg.to_options();
        assert!(opts.echo_stderr);
        assert!(!opts.log_event);
        assert!(opts.capture_backtrace);
        assert_eq!(opts.halt as usize, terminus_core::hard_stop as usize);
    }
}
