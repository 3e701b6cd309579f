use crate::config::DispatchConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the dispatcher configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/EasyStat.toml";

/// Prefix for environment overrides, e.g. `EASY_STAT_THRESHOLDS__N_MAX=50`.
pub const ENV_PREFIX: &str = "EASY_STAT_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the dispatcher configuration by layering defaults, TOML and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or the thresholds are invalid.
    pub fn load() -> Result<DispatchConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads the dispatcher configuration from a specific TOML file.
    ///
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or the thresholds are invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<DispatchConfig> {
        let config: DispatchConfig = Figment::from(Serialized::defaults(DispatchConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.thresholds.validate()?;
        tracing::debug!(?config, "Dispatch configuration loaded");

        Ok(config)
    }
}
