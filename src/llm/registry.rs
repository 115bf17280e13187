//! Model registry for managing available LLM providers

use super::{all_models, LlmService, LoggingService, ModelDef, Provider};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

const PREFERRED_DEFAULT: &str = "gemini-1.5-pro";

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub google_api_key: Option<String>,
    /// Gateway URL that authenticates on our behalf
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_empty_env(Provider::Google.api_key_env_var()),
            gateway: non_empty_env("LLM_GATEWAY"),
            default_model: non_empty_env("DEFAULT_MODEL"),
        }
    }

    fn api_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_api_key.as_deref(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Model information exposed to the page
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub description: String,
    pub context_window: usize,
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        for model_def in all_models() {
            if let Some(service) = Self::try_create_model(model_def, config) {
                services.insert(model_def.id.to_string(), service);
            }
        }

        let configured = config.default_model.clone().filter(|id| {
            let known = services.contains_key(id);
            if !known && !services.is_empty() {
                tracing::warn!(model = %id, "Configured DEFAULT_MODEL is unavailable, falling back");
            }
            known
        });

        let default_model = configured
            .or_else(|| {
                if services.contains_key(PREFERRED_DEFAULT) {
                    Some(PREFERRED_DEFAULT.to_string())
                } else {
                    let mut ids: Vec<_> = services.keys().cloned().collect();
                    ids.sort();
                    ids.into_iter().next()
                }
            })
            .unwrap_or_else(|| PREFERRED_DEFAULT.to_string());

        Self {
            services,
            default_model,
        }
    }

    /// Try to create a model service, validating prerequisites
    fn try_create_model(model_def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        // Gateway mode authenticates upstream, so no key is sent
        let api_key = if config.gateway.is_some() {
            None
        } else {
            Some(config.api_key(model_def.provider)?)
        };

        match (model_def.factory)(api_key, config.gateway.as_deref()) {
            Ok(service) => Some(Arc::new(LoggingService::new(service))),
            Err(e) => {
                tracing::warn!(model = model_def.id, error = %e, "Skipping model");
                None
            }
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.get(&self.default_model)
    }

    /// Get the default model ID
    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    /// Get detailed information about available models
    pub fn available_model_info(&self) -> Vec<ModelInfo> {
        all_models()
            .iter()
            .filter(|def| self.services.contains_key(def.id))
            .map(|def| ModelInfo {
                id: def.id.to_string(),
                provider: def.provider.display_name().to_string(),
                description: def.description.to_string(),
                context_window: def.context_window,
            })
            .collect()
    }

    /// Check if any models are available
    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_credentials_means_no_models() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert!(!registry.has_models());
        assert!(registry.default().is_none());
        assert_eq!(registry.default_model_id(), PREFERRED_DEFAULT);
    }

    #[test]
    fn api_key_registers_every_model() {
        let config = LlmConfig {
            google_api_key: Some("key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(
            registry.available_models(),
            vec!["gemini-1.5-flash".to_string(), "gemini-1.5-pro".to_string()]
        );
        assert_eq!(registry.default_model_id(), "gemini-1.5-pro");
        assert_eq!(registry.available_model_info()[0].provider, "Google");
    }

    #[test]
    fn configured_default_wins() {
        let config = LlmConfig {
            gateway: Some("http://gw".to_string()),
            default_model: Some("gemini-1.5-flash".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(
            registry.default().map(|s| s.model_id().to_string()),
            Some("gemini-1.5-flash".to_string())
        );
    }

    #[test]
    fn unknown_configured_default_falls_back() {
        let config = LlmConfig {
            google_api_key: Some("key".to_string()),
            default_model: Some("bogus".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), PREFERRED_DEFAULT);
        assert!(registry.default().is_some());
    }
}
