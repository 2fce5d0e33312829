//! Configuration module for the ulpt CLI.
//!
//! This module handles loading, saving, and managing configuration
//! settings for the ulpt test harness: where the compiler under test
//! lives, where the fixture suites live, and how runs behave.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, UlptError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "ulpt.toml";

/// Application configuration structure.
///
/// This struct represents the complete configuration for the ulpt CLI,
/// including global settings and per-command options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Path of the compiler executable under test.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Directory the compiler writes its build artifact into.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Fixed artifact file name inside the build directory. Every
    /// fixture run overwrites the same path.
    #[serde(default = "default_artifact")]
    pub artifact: String,

    /// File-name suffix that marks a file as a fixture.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Fixture suite locations.
    #[serde(default)]
    pub suites: SuitesConfig,

    /// Run-specific configuration.
    #[serde(default)]
    pub run: RunConfig,
}

/// Fixture suite locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitesConfig {
    /// Directory of fixtures the compiler must accept (exit code 0).
    #[serde(default = "default_pos_dir")]
    pub pos_dir: String,

    /// Directory of fixtures the compiler must reject (exit code 1).
    #[serde(default = "default_neg_dir")]
    pub neg_dir: String,
}

/// Run-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RunConfig {
    /// Per-fixture timeout in seconds. Absent means no timeout: a hung
    /// compiler invocation hangs the run.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Default value functions for configuration fields.
fn default_compiler() -> String {
    "build/ulpc".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_artifact() -> String {
    "out".to_string()
}

fn default_extension() -> String {
    ".ul".to_string()
}

fn default_pos_dir() -> String {
    "test/cases/pos".to_string()
}

fn default_neg_dir() -> String {
    "test/cases/neg".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            compiler: default_compiler(),
            build_dir: default_build_dir(),
            artifact: default_artifact(),
            extension: default_extension(),
            suites: SuitesConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for SuitesConfig {
    fn default() -> Self {
        Self {
            pos_dir: default_pos_dir(),
            neg_dir: default_neg_dir(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        match config_path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - The loaded configuration or an error
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(UlptError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| UlptError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    ///
    /// # Arguments
    /// * `path` - Path where the configuration should be saved
    ///
    /// # Returns
    /// * `Result<()>` - Success or an error
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| UlptError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("ulpt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("ulpt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    ///
    /// # Returns
    /// * `Result<Option<PathBuf>>` - Path to config file if found, None otherwise
    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config))
    }
}
