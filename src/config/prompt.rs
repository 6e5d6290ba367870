use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are RentBot, the friendly assistant of a peer-to-peer rental marketplace where people borrow and lend everyday items such as cameras, tools, camping gear, electronics and furniture. Help users find items to rent, explain how listing, booking, pickup, deposits and returns work, and guide lenders through creating listings. Keep answers short and practical. The marketplace currently operates only in Pune, India: if a user asks about renting or delivery anywhere else, politely explain that service is limited to Pune. Do not answer questions unrelated to renting on the marketplace.";

pub const DEFAULT_FALLBACK_RESPONSE: &str = "I'm not sure how to answer that, but I'd love to help you with renting. Could you tell me more about what you're looking to borrow or lend?";

#[derive(Debug)]
pub enum PromptError {
    EmptyField(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyField(key) => write!(f, "Prompt field '{}' must not be empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Server-held prompt texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub system_instruction: String,
    pub fallback_response: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            fallback_response: DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct PromptFile {
    system_instruction: Option<String>,
    fallback_response: Option<String>,
}

pub fn parse_prompts(content: &str) -> Result<PromptConfig, PromptError> {
    let file: PromptFile = serde_json::from_str(content)?;
    let defaults = PromptConfig::default();

    let system_instruction = match file.system_instruction {
        Some(s) if s.trim().is_empty() => {
            return Err(PromptError::EmptyField("system_instruction"));
        }
        Some(s) => s,
        None => defaults.system_instruction,
    };
    let fallback_response = match file.fallback_response {
        Some(s) if s.trim().is_empty() => {
            return Err(PromptError::EmptyField("fallback_response"));
        }
        Some(s) => s,
        None => defaults.fallback_response,
    };

    Ok(PromptConfig { system_instruction, fallback_response })
}

pub fn load_prompts(path: &str) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
    let config = parse_prompts(&file_content).map_err(|e|
        format!("Failed to parse prompts file '{}': {}", path, e)
    )?;
    info!("Loaded prompt overrides from {}", path);
    Ok(Arc::new(config))
}
