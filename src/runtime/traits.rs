//! Trait abstractions for runtime I/O
//!
//! The session manager only sees `LlmClient`, so tests can swap in mocks.

use crate::llm::{LlmError, LlmRequest, LlmResponse, ModelRegistry, Provider};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for making LLM requests
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete an LLM request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        (**self).complete(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use ModelRegistry as LlmClient
pub struct RegistryLlmClient {
    registry: Arc<ModelRegistry>,
    model_id: String,
}

impl RegistryLlmClient {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        let model_id = registry.default_model_id().to_string();
        Self { registry, model_id }
    }
}

#[async_trait]
impl LlmClient for RegistryLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let llm = self
            .registry
            .get(&self.model_id)
            .or_else(|| self.registry.default())
            .ok_or_else(|| {
                LlmError::auth(format!(
                    "No LLM configured. Set {} or LLM_GATEWAY.",
                    Provider::Google.api_key_env_var()
                ))
            })?;
        llm.complete(request).await
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmConfig, LlmErrorKind, LlmMessage};

    #[tokio::test]
    async fn empty_registry_fails_with_auth() {
        let client = RegistryLlmClient::new(Arc::new(ModelRegistry::new(&LlmConfig::default())));
        let request = LlmRequest {
            system: vec![],
            messages: vec![LlmMessage::user("hi")],
            temperature: None,
            max_tokens: None,
        };

        let err = client.complete(&request).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
        assert!(err.message.contains("GOOGLE_API_KEY"));
    }
}
