use crate::config::prompt::PromptConfig;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::llm::chat::{ ChatClient, Completion, new_client };
use crate::llm::{ ProviderMessage, ProviderRole };
use crate::models::chat::{ ChatRequest, ConversationTurn };

use log::{ debug, info, warn };
use std::sync::Arc;
use uuid::Uuid;

/// `assistant` becomes `model`; every other role, known or not, becomes `user`.
pub fn map_role(role: &str) -> ProviderRole {
    match role {
        "assistant" => ProviderRole::Model,
        "user" => ProviderRole::User,
        other => {
            debug!("Unrecognised history role '{}' forwarded as user", other);
            ProviderRole::User
        }
    }
}

/// System entry, then history in order, then the new message as a user turn.
pub fn build_contents(
    system_instruction: &str,
    history: &[ConversationTurn],
    message: &str
) -> Vec<ProviderMessage> {
    let mut contents = Vec::with_capacity(history.len() + 2);
    contents.push(ProviderMessage::text(ProviderRole::System, system_instruction));
    contents.extend(
        history.iter().map(|turn| ProviderMessage::text(map_role(&turn.role), turn.content.as_str()))
    );
    contents.push(ProviderMessage::text(ProviderRole::User, message));
    contents
}

pub struct ChatProxy {
    chat_client: Arc<dyn ChatClient>,
    prompts: Arc<PromptConfig>,
    max_history_turns: Option<usize>,
}

impl ChatProxy {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        prompts: Arc<PromptConfig>,
        max_history_turns: Option<usize>
    ) -> Self {
        Self { chat_client, prompts, max_history_turns }
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let chat_client = new_client(&config.llm)?;
        info!(
            "Chat client configured: Model={}, BaseURL={}",
            chat_client.get_model(),
            config.llm.base_url
        );
        Ok(Self::new(chat_client, config.prompts.clone(), config.max_history_turns))
    }

    fn bounded_history<'a>(&self, history: &'a [ConversationTurn]) -> &'a [ConversationTurn] {
        match self.max_history_turns {
            Some(limit) if history.len() > limit => {
                warn!(
                    "History has {} turns, forwarding only the most recent {}",
                    history.len(),
                    limit
                );
                &history[history.len() - limit..]
            }
            _ => history,
        }
    }

    pub async fn handle_chat(&self, request: ChatRequest) -> Result<String, ProxyError> {
        let request_id = Uuid::new_v4();
        let history = self.bounded_history(&request.history);
        info!("[{}] Chat request: {} history turns", request_id, history.len());

        let contents = build_contents(&self.prompts.system_instruction, history, &request.message);

        match self.chat_client.generate(contents).await? {
            Completion::Text(text) => {
                info!("[{}] Provider answered ({} chars)", request_id, text.len());
                Ok(text)
            }
            Completion::Empty => {
                warn!("[{}] Provider returned no text, using fallback response", request_id);
                Ok(self.prompts.fallback_response.clone())
            }
        }
    }
}
