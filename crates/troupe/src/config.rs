//! Configuration loading for the Troupe binary and library callers.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Bundled defaults (include_str! from troupe.toml)
//! 2. `~/.config/troupe/troupe.toml`
//! 3. `./troupe.toml`

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use troupe_error::{ConfigError, ConfigErrorKind, TroupeError, TroupeResult};
use troupe_models::ServiceConfig;
use troupe_rebalance::{RebalanceConfig, WorkshopConfig};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../troupe.toml");

/// Top-level Troupe configuration.
///
/// # Example
///
/// ```no_run
/// use troupe::TroupeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TroupeConfig::load()?;
/// println!("provider: {}", config.service.provider);
/// println!("rewrite attempts: {}", config.rebalance.attempts.rewrite);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TroupeConfig {
    /// Which generation service to use
    #[serde(default)]
    pub service: ServiceConfig,

    /// Rebalance engine policy
    #[serde(default)]
    pub rebalance: RebalanceConfig,

    /// Review, polish, stage kit and rehearsal request limits
    #[serde(default)]
    pub workshop: WorkshopConfig,
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> TroupeResult<TroupeConfig> {
    builder
        .build()
        .map_err(|e| TroupeError::from(ConfigError::new(ConfigErrorKind::Load(e.to_string()))))?
        .try_deserialize()
        .map_err(|e| TroupeError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string()))))
}

impl TroupeConfig {
    /// Load configuration from a single file; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TroupeResult<Self> {
        debug!("Loading configuration from file");
        build(Config::builder().add_source(File::from(path.as_ref())))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> TroupeResult<Self> {
        build(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    /// Load bundled defaults, then the home directory file, then `./troupe.toml`.
    ///
    /// Missing user files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a file that exists cannot be parsed.
    #[instrument]
    pub fn load() -> TroupeResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/troupe/troupe.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("troupe").required(false));

        build(builder)
    }

    /// The bundled defaults alone.
    pub fn bundled_defaults() -> &'static str {
        DEFAULT_CONFIG
    }
}
