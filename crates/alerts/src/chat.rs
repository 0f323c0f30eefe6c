//! Group chat delivery.
//!
//! Alerts are posted to the Token Bowl chat API as `{"content": "..."}`
//! with the API key in the `X-API-Key` header.

use async_trait::async_trait;
use serde::Serialize;
use sleeper_engine::{AlertSink, DeliveryError};
use std::time::Duration;
use tracing::{info, warn};

/// Default chat endpoint.
pub const DEFAULT_CHAT_URL: &str = "https://api.tokenbowl.ai/messages";

/// Configuration for the chat API.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    content: &'a str,
}

/// Posts alerts to the Token Bowl group chat.
pub struct TokenBowlChat {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl TokenBowlChat {
    pub fn new(config: ChatConfig) -> Result<Self, DeliveryError> {
        if config.api_key.trim().is_empty() || config.url.trim().is_empty() {
            return Err(DeliveryError::NotConfigured);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl AlertSink for TokenBowlChat {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(&self.url)
            .header("X-API-Key", &self.api_key)
            .json(&ChatMessage { content: message })
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if matches!(status, 200 | 201) {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status, "Chat API returned non-success status");
        Err(DeliveryError::Rejected { status, body })
    }
}

/// Logs alerts instead of posting them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

#[async_trait]
impl AlertSink for DryRunSink {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        info!("Chat API not configured, alert not posted:\n{}", message);
        Ok(())
    }
}

/// Sink chosen at startup from the configuration.
pub enum ChatSink {
    Live(TokenBowlChat),
    DryRun(DryRunSink),
}

impl ChatSink {
    /// Post to the chat when an API key is present, otherwise log only.
    pub fn from_settings(url: &str, api_key: Option<&str>) -> Result<Self, DeliveryError> {
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => {
                let chat = TokenBowlChat::new(ChatConfig::new(key).with_url(url))?;
                Ok(ChatSink::Live(chat))
            }
            None => {
                warn!("CHAT_API_KEY not set - messages will not be posted to chat");
                Ok(ChatSink::DryRun(DryRunSink))
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ChatSink::Live(_))
    }
}

#[async_trait]
impl AlertSink for ChatSink {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        match self {
            ChatSink::Live(chat) => chat.deliver(message).await,
            ChatSink::DryRun(sink) => sink.deliver(message).await,
        }
    }
}
