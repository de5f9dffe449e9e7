//! Framework configuration is represented by [DroneConfig], which is used by
//! [DroneRuntimeBuilder](crate::runtime::DroneRuntimeBuilder) to configure itself.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `DRONE_` or `drone.json` file. Drone-specific
//! configuration lives in a separate descriptor, pointed to by [DroneConfig::descriptor_file].

use config::{Config, ConfigError, Environment, File};
use drone_spi::descriptor::DESCRIPTOR_FILE;
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "DRONE";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "drone.json";

/// Framework configuration.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct DroneConfig {
    /// Should a default tracing logger be installed when building the runtime.
    pub install_tracing_logger: bool,
    /// Path to the descriptor with extension configuration.
    pub descriptor_file: String,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            descriptor_file: DESCRIPTOR_FILE.to_string(),
        }
    }
}

impl From<OptionalDroneConfig> for DroneConfig {
    fn from(value: OptionalDroneConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            descriptor_file: value.descriptor_file.unwrap_or(default.descriptor_file),
        }
    }
}

impl DroneConfig {
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalDroneConfig>())
            .map(|config| config.into())
    }
}

#[derive(Deserialize)]
struct OptionalDroneConfig {
    install_tracing_logger: Option<bool>,
    descriptor_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::config::{DroneConfig, OptionalDroneConfig};

    #[test]
    fn should_fill_missing_values_with_defaults() {
        let config: DroneConfig = OptionalDroneConfig {
            install_tracing_logger: Some(false),
            descriptor_file: None,
        }
        .into();

        assert!(!config.install_tracing_logger);
        assert_eq!(config.descriptor_file, "arquillian.json");
    }
}
