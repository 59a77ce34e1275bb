use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalyticsConfig, ForecastConfig, LoggingSettings, RiskConfig, ServerSettings, Settings,
    TrendConfig,
};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fintrack.toml";

/// Prefix of environment variables that override file settings,
/// e.g. `FINTRACK__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "FINTRACK";

/// Loads and validates the application configuration.
///
/// Sources are layered in increasing precedence: built-in defaults, the TOML
/// file (the given `path`, which must exist, or an optional `fintrack.toml`),
/// then `FINTRACK__*` environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}
