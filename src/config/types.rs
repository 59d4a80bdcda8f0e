use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::backend::BackendConfig;
use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::providers::ProviderConfig;

/// Prefix for environment overrides, e.g. `PANTRYCHEF_BACKEND__BASE_URL`.
pub const ENV_PREFIX: &str = "PANTRYCHEF_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub identity: ProviderConfig,
    pub backend: BackendConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Knobs for the login flow.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct SessionConfig {
    /// Upper bound for a whole login (prompt + profile fetch). Unbounded if unset.
    pub login_timeout_in_ms: Option<u64>,
}

/// Load config from a YAML file, with `PANTRYCHEF_*` environment overrides on top.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract(figment)
}

/// Parse a config from an in-memory YAML document (no environment overrides).
pub fn load_config_str(yaml: &str) -> Result<ConfigV1, figment::Error> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

fn extract(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
