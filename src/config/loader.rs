// src/config/loader.rs
//! Layered configuration loader with validation

use crate::config::constants::{env as env_constants, paths, validation};
use crate::config::DesignConfig;
use crate::error::{DesignError, DesignErrorBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration loader merging defaults, files and environment overrides
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
    current_config: DesignConfig,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the given path
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The file is not valid TOML for a design configuration
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Every consistency check that failed
    #[error("Configuration validation errors: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for DesignError {
    fn from(err: ConfigError) -> Self {
        DesignErrorBuilder::new("config_loader", "load").configuration(&err.to_string())
    }
}

impl ConfigLoader {
    /// Create loader searching the standard configuration locations
    pub fn new() -> Self {
        Self::with_paths(Self::discover_config_paths())
    }

    /// Create loader with custom paths, later paths taking precedence
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_prefix: env_constants::ENV_PREFIX.to_string(),
            current_config: DesignConfig::default(),
        }
    }

    /// Use a different environment variable prefix
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Load design configuration with validation
    pub fn load_design_config(&mut self) -> Result<DesignConfig, ConfigError> {
        let config = self.load_and_merge_configs()?;
        self.current_config = config.clone();
        Ok(config)
    }

    /// Get current configuration
    pub fn current_config(&self) -> &DesignConfig {
        &self.current_config
    }

    /// Search paths in precedence order
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Validate a configuration file without loading it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let mut merged = Self::default_value()?;
        Self::merge_toml_values(&mut merged, Self::load_config_file(path.as_ref())?);
        Self::into_config(merged).map(|_| ())
    }

    /// Export current configuration to file
    pub fn export_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(&self.current_config)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_and_merge_configs(&self) -> Result<DesignConfig, ConfigError> {
        let mut merged_config = Self::default_value()?;

        for config_path in &self.config_paths {
            match Self::load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    Self::merge_toml_values(&mut merged_config, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue, // optional layer
                Err(e) => return Err(e),
            }
        }

        self.apply_environment_overrides(&mut merged_config);
        Self::into_config(merged_config)
    }

    fn default_value() -> Result<toml::Value, ConfigError> {
        toml::Value::try_from(DesignConfig::default()).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn into_config(value: toml::Value) -> Result<DesignConfig, ConfigError> {
        let config: DesignConfig = value
            .try_into()
            .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;
        config.validate_consistency().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    fn load_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let size = std::fs::metadata(path)?.len();
        if size > validation::MAX_CONFIG_FILE_SIZE_BYTES as u64 {
            return Err(ConfigError::ValidationError(vec![format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                validation::MAX_CONFIG_FILE_SIZE_BYTES
            )]));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
        match (base, overlay) {
            (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
                for (key, value) in overlay_table {
                    if let Some(base_value) = base_table.get_mut(&key) {
                        Self::merge_toml_values(base_value, value);
                    } else {
                        base_table.insert(key, value);
                    }
                }
            }
            (base_value, overlay_value) => {
                *base_value = overlay_value;
            }
        }
    }

    fn apply_environment_overrides(&self, config: &mut toml::Value) {
        for (key, value) in std::env::vars() {
            let Some(stripped) = key.strip_prefix(&self.env_prefix) else {
                continue;
            };
            let lowered = stripped.to_lowercase();
            let parts: Vec<&str> = lowered.split('_').collect();

            if Self::set_nested_value(config, &parts, Self::parse_env_value(&value)) {
                debug!(variable = %key, "applied environment override");
            } else {
                warn!(variable = %key, "environment override matches no configuration key");
            }
        }
    }

    fn parse_env_value(value: &str) -> toml::Value {
        if let Ok(int_val) = value.parse::<i64>() {
            toml::Value::Integer(int_val)
        } else if let Ok(float_val) = value.parse::<f64>() {
            toml::Value::Float(float_val)
        } else if let Ok(bool_val) = value.parse::<bool>() {
            toml::Value::Boolean(bool_val)
        } else {
            toml::Value::String(value.to_string())
        }
    }

    /// Walk `parts` through nested tables. Keys may themselves contain underscores, so
    /// at each level the longest run of parts naming an existing key wins.
    fn set_nested_value(config: &mut toml::Value, parts: &[&str], value: toml::Value) -> bool {
        let toml::Value::Table(table) = config else {
            return false;
        };

        for split in (1..=parts.len()).rev() {
            let key = parts[..split].join("_");
            let Some(entry) = table.get_mut(&key) else {
                continue;
            };
            if split == parts.len() {
                if entry.is_table() {
                    return false;
                }
                *entry = Self::coerce(entry, value);
                return true;
            }
            if entry.is_table() {
                return Self::set_nested_value(entry, &parts[split..], value);
            }
        }
        false
    }

    // Integer literals are accepted for float fields such as `FILTER_DESIGN_NOTCH_BANDWIDTH=3`
    fn coerce(existing: &toml::Value, value: toml::Value) -> toml::Value {
        match (existing, value) {
            (toml::Value::Float(_), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
            (_, value) => value,
        }
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![PathBuf::from(paths::SYSTEM_CONFIG_PATH)];

        if let Some(home_dir) = home_dir() {
            config_paths.push(home_dir.join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        // Local configurations (in order of precedence)
        config_paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        config_paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));

        config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::FilterBand;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_config_loader_creation() {
        let loader = ConfigLoader::new();
        assert!(!loader.config_paths().is_empty());
        assert!(loader
            .config_paths()
            .iter()
            .any(|p| p.ends_with(paths::LOCAL_CONFIG_FILE)));
    }

    #[test]
    #[serial]
    fn test_load_default_config() {
        let mut loader = ConfigLoader::with_paths(vec![PathBuf::from("does/not/exist.toml")]);
        let config = loader.load_design_config().unwrap();
        assert_eq!(config, DesignConfig::default());
    }

    #[test]
    #[serial]
    fn test_files_merge_in_order() {
        let base = config_file(
            r#"
[response]
band = "highpass"
pass_edge = 0.4
stop_edge = 0.3

[notch]
center_freq = 50.0
"#,
        );
        let overlay = config_file(
            r#"
[notch]
bandwidth = 4.0
"#,
        );

        let mut loader = ConfigLoader::with_paths(vec![base.path().to_path_buf(), overlay.path().to_path_buf()]);
        let config = loader.load_design_config().unwrap();

        assert_eq!(config.response.band, FilterBand::Highpass);
        assert_eq!(config.response.pass_edge, 0.4);
        assert_eq!(config.notch.center_freq, 50.0);
        assert_eq!(config.notch.bandwidth, 4.0);
        assert_eq!(loader.current_config(), &config);
    }

    #[test]
    fn test_config_file_validation() {
        let loader = ConfigLoader::with_paths(vec![]);
        let temp_file = config_file(
            r#"
[least_squares]
order = 21

[notch]
center_freq = 50.0
sample_rate = 1000.0
"#,
        );

        assert!(loader.validate_config_file(temp_file.path()).is_ok());
    }

    #[test]
    fn test_invalid_config_validation() {
        let loader = ConfigLoader::with_paths(vec![]);

        let temp_file = config_file(
            r#"
[notch]
center_freq = 400.0  # above Nyquist
"#,
        );
        assert!(matches!(
            loader.validate_config_file(temp_file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let temp_file = config_file("[response]\nband = \"allpass\"");
        assert!(matches!(
            loader.validate_config_file(temp_file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        std::env::set_var("FILTER_DESIGN_NOTCH_CENTER_FREQ", "50");
        std::env::set_var("FILTER_DESIGN_LEAST_SQUARES_ORDER", "41");
        std::env::set_var("FILTER_DESIGN_RESPONSE_BAND", "lowpass");
        std::env::set_var("FILTER_DESIGN_NO_SUCH_KEY", "1");

        let mut loader = ConfigLoader::with_paths(vec![]);
        let result = loader.load_design_config();

        std::env::remove_var("FILTER_DESIGN_NOTCH_CENTER_FREQ");
        std::env::remove_var("FILTER_DESIGN_LEAST_SQUARES_ORDER");
        std::env::remove_var("FILTER_DESIGN_RESPONSE_BAND");
        std::env::remove_var("FILTER_DESIGN_NO_SUCH_KEY");

        let config = result.unwrap();
        assert_eq!(config.notch.center_freq, 50.0);
        assert_eq!(config.least_squares.order, 41);
        assert_eq!(config.response.band, FilterBand::Lowpass);
    }

    #[test]
    #[serial]
    fn test_custom_env_prefix() {
        std::env::set_var("FD_TEST_NOTCH_BANDWIDTH", "5.5");
        let mut loader = ConfigLoader::with_paths(vec![]).with_env_prefix("FD_TEST_");
        let result = loader.load_design_config();
        std::env::remove_var("FD_TEST_NOTCH_BANDWIDTH");

        assert_eq!(result.unwrap().notch.bandwidth, 5.5);
    }

    #[test]
    fn test_set_nested_value_prefers_existing_keys() {
        let mut value = toml::Value::try_from(DesignConfig::default()).unwrap();
        assert!(ConfigLoader::set_nested_value(
            &mut value,
            &["response", "stop", "edge"],
            toml::Value::Integer(1)
        ));
        assert_eq!(value["response"]["stop_edge"], toml::Value::Float(1.0));
        assert!(!ConfigLoader::set_nested_value(&mut value, &["response", "nope"], toml::Value::Integer(1)));
    }

    #[test]
    fn test_config_export() {
        let loader = ConfigLoader::with_paths(vec![]);
        let temp_file = NamedTempFile::new().unwrap();

        loader.export_config(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[notch]"));
        assert!(content.contains("[response]"));
        assert!(loader.validate_config_file(temp_file.path()).is_ok());
    }

    #[test]
    fn test_config_error_converts_to_design_error() {
        let err: DesignError = ConfigError::FileNotFound("missing.toml".into()).into();
        assert!(err.to_string().contains("missing.toml"));
    }
}
