use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable prefix; nested keys use a double underscore,
/// e.g. ASSESSFLOW_LLM__API_KEY
const ENV_PREFIX: &str = "ASSESSFLOW_";

const CONFIG_FILE: &str = "assessflow.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider: LLMProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        let defaults = LLMConfig::default();
        Self {
            provider: defaults.provider,
            base_url: defaults.base_url,
            model: defaults.model,
            api_key: None,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmSettings,
}

impl AppConfig {
    /// Load configuration from defaults, an optional assessflow.toml in
    /// the working directory, and ASSESSFLOW_-prefixed environment
    /// variables, in increasing priority.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            provider: self.llm.provider.clone(),
            base_url: self.llm.base_url.clone(),
            model: self.llm.model.clone(),
            api_key: self.llm.api_key.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
        }
    }
}
