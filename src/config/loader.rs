//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (highest priority, applied by the caller)
    /// 2. Environment variables
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        // Load from config file if provided
        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
        } else if let Some(path) = default_config_path()
            && path.exists()
        {
            info!("Loading configuration from file: {:?}", path);
            settings = Settings::from_file(&path)?;
        }

        // Override with environment variables
        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;

        // Validate final configuration
        settings.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load configuration from environment only
    pub fn from_env_only(&self) -> Result<Settings> {
        let settings = Settings::from_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Well-known config file location (`<config dir>/magpie/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("magpie").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_defaults() {
        let loader = ConfigLoader::new();
        let settings = loader.defaults();

        assert_eq!(settings.network.timeout_secs, 30);
        assert_eq!(settings.crawl.interval_secs, 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[network]
timeout_secs = 10

[crawl]
interval_secs = 5
        "#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let settings = loader.load(Some(temp_file.path())).unwrap();

        assert_eq!(settings.network.timeout_secs, 10);
        assert_eq!(settings.crawl.interval_secs, 5);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loader = ConfigLoader::new();
        let settings = loader
            .load(Some(Path::new("/nonexistent/magpie.toml")))
            .unwrap();

        // Fields no environment variable touches
        assert!(!settings.network.verify_tls);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_env_var_override() {
        unsafe {
            std::env::set_var("MAGPIE_TIMEOUT", "45");
            std::env::set_var("MAGPIE_INTERVAL", "7");
        }

        let loader = ConfigLoader::new();
        let settings = loader.from_env_only().unwrap();

        assert_eq!(settings.network.timeout_secs, 45);
        assert_eq!(settings.crawl.interval_secs, 7);

        unsafe {
            std::env::remove_var("MAGPIE_TIMEOUT");
            std::env::remove_var("MAGPIE_INTERVAL");
        }
    }
}
