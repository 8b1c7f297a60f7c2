use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Durable storage backing the session store. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// A JSON document on disk holding key/value entries, like browser local storage.
    #[serde(rename = "file")]
    File { path: PathBuf },
    /// Process-local storage; nothing survives a restart.
    #[serde(rename = "memory")]
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: PathBuf::from("./local_storage.json"),
        }
    }
}
