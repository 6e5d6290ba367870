pub mod prompt;

use crate::cli::Args;
use crate::llm::LlmConfig;
use self::prompt::PromptConfig;
use std::error::Error;
use std::sync::Arc;

/// Everything the proxy needs, resolved once at startup. Nothing here can be
/// influenced by a request.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub llm: LlmConfig,
    pub prompts: Arc<PromptConfig>,
    pub max_history_turns: Option<usize>,
}

impl ProxyConfig {
    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let prompts = match &args.prompts_path {
            Some(path) if !path.trim().is_empty() => prompt::load_prompts(path)?,
            _ => Arc::new(PromptConfig::default()),
        };

        Ok(Self {
            llm: LlmConfig {
                api_key: args.chat_api_key.clone(),
                base_url: args.chat_base_url.clone(),
                model: args.chat_model.clone(),
                timeout_secs: args.provider_timeout_secs.filter(|s| *s > 0),
            },
            prompts,
            max_history_turns: args.max_history_turns,
        })
    }
}
