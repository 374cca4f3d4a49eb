//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

fn default_api_timeout_secs() -> u64 {
    15
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// Base URL of the raffle API, e.g. `https://api.example.com`.
    pub api_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
}

impl ServerConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs.max(1))
    }
}
