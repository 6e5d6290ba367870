use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE } };
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{ ChatClient, Completion };
use crate::error::ProxyError;
use crate::llm::{ GenerationConfig, LlmConfig, ProviderMessage };

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<ProviderMessage>,
    generation_config: GenerationConfig,
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
/// Any missing level, or an empty text, yields `Completion::Empty`.
pub fn extract_text(body: &Value) -> Completion {
    match body.pointer("/candidates/0/content/parts/0/text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Completion::Text(text.to_string()),
        _ => Completion::Empty,
    }
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout_secs: Option<u64>
    ) -> Result<Self, ProxyError> {
        if api_key.trim().is_empty() {
            return Err(ProxyError::Config("Gemini API key (CHAT_API_KEY) is required".into()));
        }

        let endpoint_str = format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        let endpoint = Url::parse(&endpoint_str).map_err(|e|
            ProxyError::Config(format!("Invalid provider URL '{}': {}", endpoint_str, e))
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ProxyError> {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            &config.base_url,
            config.timeout_secs,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn generate(
        &self,
        contents: Vec<ProviderMessage>
    ) -> Result<Completion, ProxyError> {
        info!(
            "GeminiChatClient::generate() → model={} entries={}",
            self.model,
            contents.len()
        );

        let payload = GeminiRequest {
            contents,
            generation_config: GenerationConfig::default(),
        };

        let resp = self.http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProxyError::ProviderStatus { status });
        }

        let body: Value = resp.json().await?;
        let completion = extract_text(&body);
        if completion == Completion::Empty {
            debug!("Provider response had no candidate text: {}", body);
        }
        Ok(completion)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
