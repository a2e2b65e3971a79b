//! Configuration Loader
//!
//! Loads configuration from defaults, config files and the environment, in
//! that order of increasing precedence, then validates the result.

use crate::config::AvtrackConfig;
use crate::error::{AvtrackError, Result};
use avtrack_common::{CONFIG_DIR_NAME, CONFIG_FILE_STEM};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Configuration loader that handles multiple sources with precedence
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base configuration
    base_config: AvtrackConfig,
    /// Configuration files, merged in order so later files win
    config_paths: Vec<PathBuf>,
    /// Whether to load from environment variables
    load_from_env: bool,
    /// Variables to use instead of the process environment
    env_vars: Option<HashMap<String, String>>,
    /// Fail on missing or unreadable files instead of skipping them
    strict: bool,
    /// Whether to validate the final configuration
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_config: AvtrackConfig::default(),
            config_paths: Self::get_default_config_paths(),
            load_from_env: true,
            env_vars: None,
            strict: false,
            validate: true,
        }
    }

    /// Set the base configuration
    #[must_use]
    pub fn with_base_config(mut self, config: AvtrackConfig) -> Self {
        self.base_config = config;
        self
    }

    /// Add a configuration file path
    #[must_use]
    pub fn add_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Set configuration file paths
    #[must_use]
    pub fn with_config_paths<P: AsRef<Path>>(mut self, paths: Vec<P>) -> Self {
        self.config_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    /// Disable loading from environment variables
    #[must_use]
    pub fn without_env_loading(mut self) -> Self {
        self.load_from_env = false;
        self
    }

    /// Read overrides from `vars` instead of the process environment
    #[must_use]
    pub fn with_env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars = Some(vars);
        self.load_from_env = true;
        self
    }

    /// Treat every configured file as required
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Enable or disable configuration validation
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid
    pub fn load(&self) -> Result<AvtrackConfig> {
        let mut config = self.base_config.clone();
        debug!("Starting configuration loading process");

        for path in &self.config_paths {
            if !path.exists() {
                if self.strict {
                    return Err(AvtrackError::configuration(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                debug!("Configuration file not found: {}", path.display());
                continue;
            }

            debug!("Loading configuration from file: {}", path.display());
            match AvtrackConfig::read_layer(path).and_then(|layer| config.merge_with(&layer)) {
                Ok(()) => info!("Loaded configuration from: {}", path.display()),
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    warn!(
                        "Failed to load configuration from {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        if self.load_from_env {
            debug!("Loading configuration from environment variables");
            match &self.env_vars {
                Some(vars) => config.apply_env_with(|key| vars.get(key).cloned())?,
                None => config.apply_env()?,
            }
        }

        if self.validate {
            config.validate()?;
            debug!("Configuration validation passed");
        }

        Ok(config)
    }

    /// Default configuration files, least specific first
    ///
    /// System, then user, then the working directory, so a project-local file
    /// overrides the others.
    #[must_use]
    pub fn get_default_config_paths() -> Vec<PathBuf> {
        let dirs = [
            Self::get_system_config_dir(),
            Self::get_user_config_dir(),
            PathBuf::new(),
        ];
        dirs.iter()
            .flat_map(|dir| {
                CONFIG_EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
            })
            .collect()
    }

    /// Get the user configuration directory
    #[must_use]
    pub fn get_user_config_dir() -> PathBuf {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join(CONFIG_DIR_NAME)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME)
        } else if let Ok(userprofile) = std::env::var("USERPROFILE") {
            // Windows
            PathBuf::from(userprofile)
                .join("AppData")
                .join("Roaming")
                .join(CONFIG_DIR_NAME)
        } else {
            PathBuf::from("~/.config").join(CONFIG_DIR_NAME)
        }
    }

    /// Get the system configuration directory
    #[must_use]
    pub fn get_system_config_dir() -> PathBuf {
        if cfg!(target_os = "macos") {
            PathBuf::from("/Library/Application Support").join(CONFIG_DIR_NAME)
        } else if cfg!(target_os = "windows") {
            PathBuf::from("C:\\ProgramData").join(CONFIG_DIR_NAME)
        } else {
            PathBuf::from("/etc").join(CONFIG_DIR_NAME)
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Quick configuration loader that uses the default sources
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config() -> Result<AvtrackConfig> {
    ConfigLoader::new().load()
}
