use config::{Config, Environment};
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::agent::DEFAULT_MAX_TURNS;
use crate::errors::ConfigError;
use crate::providers::configs::{
    AnthropicProviderConfig, ANTHROPIC_HOST, ANTHROPIC_MAX_TOKENS, ANTHROPIC_MODEL,
};

/// Environment variable holding the provider credential
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Secrets file consulted when the credential is not in the environment
pub const SECRETS_PATH: &str = "credentials/.env";

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub host: String,
    pub model: String,
    pub max_tokens: i32,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Everything needed to build the provider and the agent, resolved once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    pub provider: ProviderSettings,
    pub max_turns: usize,
    #[serde(skip)]
    pub api_key: String,
}

impl AgentSettings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Path::new(SECRETS_PATH))
    }

    /// Load settings from defaults and `PM_AGENT_*` variables, reading the
    /// credential from `secrets_path` if it is not set in the environment
    pub fn load(secrets_path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("provider.host", ANTHROPIC_HOST)?
            .set_default("provider.model", ANTHROPIC_MODEL)?
            .set_default("provider.max_tokens", ANTHROPIC_MAX_TOKENS)?
            .set_default("max_turns", DEFAULT_MAX_TURNS as u64)?
            .add_source(
                Environment::with_prefix("PM_AGENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;
        settings.api_key = resolve_api_key(secrets_path)?;
        Ok(settings)
    }

    pub fn provider_config(&self) -> AnthropicProviderConfig {
        AnthropicProviderConfig {
            host: self.provider.host.clone(),
            api_key: self.api_key.clone(),
            model: self.provider.model.clone(),
            temperature: self.provider.temperature,
            max_tokens: Some(self.provider.max_tokens),
        }
    }
}

fn resolve_api_key(secrets_path: &Path) -> Result<String, ConfigError> {
    if let Ok(key) = env::var(API_KEY_VAR) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }

    read_secrets_file(secrets_path)?.ok_or_else(|| ConfigError::MissingApiKey {
        path: secrets_path.display().to_string(),
    })
}

// Parses the file without loading it into the process environment.
// `from_path_iter` is deprecated in dotenv 0.15 but is its only non-mutating reader.
#[allow(deprecated)]
fn read_secrets_file(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let secrets_error = |reason: String| ConfigError::SecretsFile {
        path: path.display().to_string(),
        reason,
    };

    let entries = dotenv::from_path_iter(path).map_err(|e| secrets_error(e.to_string()))?;
    for entry in entries {
        let (key, value) = entry.map_err(|e| secrets_error(e.to_string()))?;
        if key == API_KEY_VAR && !value.trim().is_empty() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
