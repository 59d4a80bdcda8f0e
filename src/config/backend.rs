use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_timeout_in_ms() -> u64 {
    10_000
}

/// Where the recipe/ingredient API lives and how long we wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct BackendConfig {
    /// e.g. "http://localhost:8080/api" (Android emulator: "http://10.0.2.2:8080/api")
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}
