//! Configuration file discovery.
//!
//! The default file lives in the platform config directory:
//! - Linux: `~/.config/navtrack/config.toml`
//! - macOS: `~/Library/Application Support/navtrack/config.toml`
//! - Windows: `%APPDATA%\navtrack\config.toml`

use navtrack::{ConfigError, DashboardConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default config directory path.
pub(crate) fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("navtrack")
}

/// Get the default config file path.
pub(crate) fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load the configuration.
///
/// An explicit path must exist. The default path is optional and falls back
/// to built-in defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<(DashboardConfig, PathBuf), ConfigError> {
    match explicit {
        Some(path) => Ok((DashboardConfig::from_path(path)?, path.to_path_buf())),
        None => {
            let path = default_config_path();
            debug!(path = %path.display(), "using default config location");
            Ok((DashboardConfig::load_or_default(&path)?, path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let path = default_config_path();
        assert!(path.ends_with("navtrack/config.toml"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let path = std::env::temp_dir().join("navtrack-missing-explicit.toml");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_explicit_path() {
        let path = std::env::temp_dir().join(format!("navtrack-bin-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[report]\ntitle = \"Family Fund\"\n").unwrap();

        let (config, resolved) = load_config(Some(&path)).unwrap();
        assert_eq!(config.report.title, "Family Fund");
        assert_eq!(resolved, path);

        std::fs::remove_file(&path).ok();
    }
}
