pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;
use super::{ LlmConfig, ProviderMessage };
use self::gemini::GeminiChatClient;
use crate::error::ProxyError;

/// Result of a successful provider call. `Empty` means the provider answered
/// with a 2xx status but no extractable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    Empty,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn generate(
        &self,
        contents: Vec<ProviderMessage>
    ) -> Result<Completion, ProxyError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ProxyError> {
    let client = GeminiChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
