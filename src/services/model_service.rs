use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// One single-turn conversation sent to the text model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Short name of the operation, used in log lines.
    pub label: &'static str,
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(label: &'static str, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            label,
            system: None,
            user: user.into(),
            temperature,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    fn messages(&self) -> Vec<serde_json::Value> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": self.user }));
        messages
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the raw text of the first choice.
    async fn complete(&self, request: ChatRequest) -> AppResult<String>;
}

/// Chat completions against the OpenAI API. Without an API key every call
/// fails with a configuration error before touching the network.
pub struct OpenAiChatModel {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(config: &Config) -> Self {
        let client = config.openai_api_key.as_ref().map(|key| {
            let mut openai_config = OpenAIConfig::new().with_api_key(key.expose_secret());
            if let Some(base) = &config.openai_api_base {
                openai_config = openai_config.with_api_base(base);
            }
            Client::with_config(openai_config)
        });

        Self {
            client,
            model: config.openai_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn request_body(&self, request: &ChatRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": request.temperature,
            "messages": request.messages(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: ChatRequest) -> AppResult<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationError("OPENAI_API_KEY is not set".to_string()))?;

        let body = self.request_body(&request);
        let response: serde_json::Value = client.chat().create_byot(body).await.map_err(|e| {
            log::error!("OpenAI request for {} failed: {}", request.label, e);
            AppError::from(e)
        })?;

        let content = response
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}
