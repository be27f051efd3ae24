//! Layered application settings
//!
//! Precedence, lowest first: built-in defaults and flat environment
//! variables (`AppConfig::from_env`), then `config.<environment>.toml` if
//! present, then `PRABHAV__SECTION__FIELD` overrides.

use ::config::{Config, ConfigError, Environment as EnvSource, File, FileFormat};
use pv_shared::config::AppConfig;

/// Prefix for nested overrides, e.g. `PRABHAV__OTP__MAX_ATTEMPTS=3`
pub const ENV_PREFIX: &str = "PRABHAV";

/// Load settings for the current process
pub fn load_settings() -> Result<AppConfig, ConfigError> {
    let base = pv_infra::load_config();
    let file = base.environment.config_file().to_string();
    layer(base, &file)
}

/// Apply the optional file and prefixed overrides on top of `base`
pub fn layer(base: AppConfig, file: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::new(file, FileFormat::Toml).required(false))
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
