use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::store::StoreConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "MOKE_CONFIG";
/// Prefix for environment overrides, e.g. `MOKE_API__BASE_URL`.
pub const ENV_PREFIX: &str = "MOKE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: remote API, durable storage and logging.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl From<Config> for ConfigV1 {
    fn from(config: Config) -> Self {
        // handle configuration migration between versions here when necessary
        match config {
            Config::ConfigV1(c) => c,
        }
    }
}

/// The configuration file to read: `$MOKE_CONFIG` or "./config.yaml".
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./config.yaml"))
}

fn extract(figment: Figment) -> Result<ConfigV1, figment::Error> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["config"]))
        .extract::<Config>()
        .map(ConfigV1::from)
}

/// Load config from a YAML file, with `MOKE_` environment overrides on top.
pub fn try_load_config(path: &Path) -> Result<ConfigV1, figment::Error> {
    extract(Figment::new().merge(Yaml::file(path)))
}

/// Parse config from an in-memory YAML document, with environment overrides on top.
pub fn config_from_str(yaml: &str) -> Result<ConfigV1, figment::Error> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

/// Load the configuration or exit the process with a readable message.
pub fn load_config() -> ConfigV1 {
    let path = config_path();
    match try_load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
