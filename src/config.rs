//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Memory persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Quiet period before a burst of observations is persisted (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("reverie").to_string_lossy().to_string())
        .unwrap_or_else(|| "./reverie_data".to_string())
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Analysis engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// How often the background analysis runs (seconds)
    #[serde(default = "default_analyze_interval")]
    pub analyze_interval_secs: u64,

    /// How long a computed pattern snapshot stays fresh (seconds)
    #[serde(default = "default_patterns_cache")]
    pub patterns_cache_secs: u64,
}

fn default_analyze_interval() -> u64 {
    300 // 5 minutes
}

fn default_patterns_cache() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyze_interval_secs: default_analyze_interval(),
            patterns_cache_secs: default_patterns_cache(),
        }
    }
}

/// Tunable limits used by the suggestion rules
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Mood at or below this triggers a supportive nudge
    #[serde(default = "default_low_mood")]
    pub low_mood: f64,

    /// Completed tasks in a day worth celebrating
    #[serde(default = "default_celebrate_after_tasks")]
    pub celebrate_after_tasks: usize,
}

fn default_low_mood() -> f64 {
    4.0
}

fn default_celebrate_after_tasks() -> usize {
    3
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_mood: default_low_mood(),
            celebrate_after_tasks: default_celebrate_after_tasks(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("reverie").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("REVERIE_DATA_DIR") {
            self.memory.data_dir = data_dir;
        }
        if let Ok(debounce) = std::env::var("REVERIE_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse() {
                self.memory.debounce_ms = ms;
            }
        }
        if let Ok(interval) = std::env::var("REVERIE_ANALYZE_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.engine.analyze_interval_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("REVERIE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("REVERIE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Reverie Configuration
#
# Environment variables override these settings:
# - REVERIE_DATA_DIR
# - REVERIE_DEBOUNCE_MS
# - REVERIE_ANALYZE_INTERVAL_SECS
# - REVERIE_LOG_LEVEL
# - REVERIE_LOG_FORMAT

[memory]
# Directory the behavioral memory file lives in
data_dir = "~/.local/share/reverie"

# Quiet period before a burst of observations is persisted (ms)
debounce_ms = 1000

[engine]
# How often the background analysis runs (seconds)
analyze_interval_secs = 300

# How long a computed pattern snapshot stays fresh (seconds)
patterns_cache_secs = 60

[thresholds]
# Mood at or below this triggers a supportive nudge
low_mood = 4.0

# Completed tasks in a day worth celebrating
celebrate_after_tasks = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.memory.debounce_ms, 1000);
        assert_eq!(config.engine.analyze_interval_secs, 300);
        assert_eq!(config.engine.patterns_cache_secs, 60);
        assert_eq!(config.thresholds.low_mood, 4.0);
        assert_eq!(config.thresholds.celebrate_after_tasks, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[memory]\ndata_dir = \"/tmp/reverie-test\"\n\n[thresholds]\nlow_mood = 3.0\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.memory.data_dir, "/tmp/reverie-test");
        assert_eq!(config.memory.debounce_ms, 1000);
        assert_eq!(config.thresholds.low_mood, 3.0);
        assert_eq!(config.thresholds.celebrate_after_tasks, 3);
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml = = =").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let content = generate_default_config();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.engine.analyze_interval_secs, 300);
    }
}
