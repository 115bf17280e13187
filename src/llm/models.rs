//! Centralized model definitions
//!
//! Every model the mentor can talk to is listed here with the factory that
//! builds its service.

use super::gemini::{GeminiModel, GeminiService};
use super::LlmService;
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
}

impl Provider {
    /// Get the display name for this provider
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Google => "Google",
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Google => "GOOGLE_API_KEY",
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "gemini-1.5-pro")
    pub id: &'static str,
    /// Provider for this model
    pub provider: Provider,
    /// Human-readable description
    pub description: &'static str,
    /// Context window size in tokens
    pub context_window: usize,
    /// Factory taking the API key (absent in gateway mode) and the gateway URL
    pub factory: fn(Option<&str>, Option<&str>) -> Result<Arc<dyn LlmService>, String>,
}

fn gemini_factory(
    model: GeminiModel,
    api_key: Option<&str>,
    gateway: Option<&str>,
) -> Result<Arc<dyn LlmService>, String> {
    if api_key.is_none() && gateway.is_none() {
        return Err(format!(
            "{} requires GOOGLE_API_KEY or LLM_GATEWAY",
            model.model_id()
        ));
    }
    let service = GeminiService::new(api_key.map(str::to_string), model, gateway)
        .map_err(|e| e.to_string())?;
    Ok(Arc::new(service))
}

/// Get all available model definitions
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-1.5-pro",
            provider: Provider::Google,
            description: "Gemini 1.5 Pro (thorough explanations)",
            context_window: 2_097_152,
            factory: |api_key, gateway| gemini_factory(GeminiModel::Gemini15Pro, api_key, gateway),
        },
        ModelDef {
            id: "gemini-1.5-flash",
            provider: Provider::Google,
            description: "Gemini 1.5 Flash (faster, lighter answers)",
            context_window: 1_048_576,
            factory: |api_key, gateway| {
                gemini_factory(GeminiModel::Gemini15Flash, api_key, gateway)
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn model_ids_are_unique() {
        let ids: HashSet<_> = all_models().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), all_models().len());
    }

    #[test]
    fn factories_agree_with_table() {
        for def in all_models() {
            let service = (def.factory)(Some("test-key"), None).unwrap();
            assert_eq!(service.model_id(), def.id);
            assert_eq!(service.context_window(), def.context_window);
        }
    }

    #[test]
    fn factory_needs_key_or_gateway() {
        for def in all_models() {
            assert!((def.factory)(None, None).is_err());
            assert!((def.factory)(None, Some("http://gw")).is_ok());
        }
    }
}
