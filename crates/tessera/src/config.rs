//! Layered configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from tessera.toml)
//! - `~/.config/tessera/tessera.toml`
//! - `./tessera.toml`

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tessera_client::ClientSettings;
use tessera_core::LogFormat;
use tessera_error::{ConfigError, TesseraError, TesseraResult};
use tessera_narrative::NarrativeConfig;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../tessera.toml");

/// `[logging]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LoggingConfig {
    /// Line format
    format: LogFormat,
}

/// Complete Tessera configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct TesseraConfig {
    /// Narrative pipeline settings
    narrative: NarrativeConfig,
    /// Service connection settings
    client: ClientSettings,
    /// Logging settings
    logging: LoggingConfig,
}

impl TesseraConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// Missing user files are skipped.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tessera::TesseraConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = TesseraConfig::load()?;
    /// println!("timeout: {}s", config.narrative().invocation_timeout_secs());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> TesseraResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/tessera/tessera.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("tessera").required(false));

        builder
            .build()
            .map_err(|e| {
                TesseraError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                TesseraError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load one explicit file on top of the bundled defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TesseraResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                TesseraError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                TesseraError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Replace the narrative settings.
    pub fn with_narrative(mut self, narrative: NarrativeConfig) -> Self {
        self.narrative = narrative;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_match_code_defaults() {
        let bundled: TesseraConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(bundled, TesseraConfig::default());
    }
}
