//! Configuration for coevod

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generative backend configuration
    #[serde(default)]
    pub cognition: CognitionConfig,

    /// Run pacing and determinism knobs
    #[serde(default)]
    pub evolution: EvolutionSettings,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cognition: CognitionConfig::default(),
            evolution: EvolutionSettings::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8089".parse().unwrap(),
            enable_cors: true,
        }
    }
}

/// Generative backend configuration.
///
/// With `simulated = true`, or when no API key can be resolved, the daemon
/// runs entirely offline on the simulated collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitionConfig {
    /// Gemini model id
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider endpoint (e.g. for a local mock)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key; `GEMINI_API_KEY` is consulted when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Force the simulated collaborators
    #[serde(default)]
    pub simulated: bool,
}

impl Default for CognitionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: None,
            api_key: None,
            simulated: false,
        }
    }
}

/// Run pacing and determinism knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionSettings {
    /// Inter-generation pacing in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Fix the synthetic-fitness seed; omit for entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            seed: None,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_model() -> String {
    coevo_cognition::DEFAULT_MODEL.to_string()
}

fn default_pacing_ms() -> u64 {
    1500
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file, and `COEVO_*`
    /// environment variables, in that order.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("COEVO")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
