//! Configuration types for the admin portal

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection details for the Firebase project backing the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project
    pub api_key: String,
    /// Firebase project id
    pub project_id: String,
    /// Firestore collection holding the driver applications
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_collection() -> String {
    "drivers".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PortalError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
