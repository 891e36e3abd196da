//! Global configuration types for Counsel.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! bind address, the language model, and prompt parameters.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Counsel server.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults,
/// so a missing file yields a working local setup (the provider API key is
/// the only thing that must come from the environment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Model identifier sent to the completion provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. The advisor is meant to be clear and
    /// professional, hence the low default.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum completion tokens per turn.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Override for the provider base URL (OpenAI-compatible endpoints).
    #[serde(default)]
    pub api_base: Option<String>,

    /// Directory holding the static front-end. Relative paths resolve
    /// against the working directory.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_web_dir() -> String {
    "static".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_base: None,
            web_dir: default_web_dir(),
        }
    }
}
