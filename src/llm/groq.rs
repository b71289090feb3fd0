use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::{ChatCompletion, ChatMessage, ChatModel};
use crate::config::GroqConfig;

/// Client for Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqChat {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

impl GroqChat {
    pub fn new(config: &GroqConfig) -> Self {
        info!(
            "Initialized GroqChat: model={}, base_url={}",
            config.model, config.base_url
        );
        Self {
            client: Client::new(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
        };

        debug!("Sending chat completion request to {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("chat completion request failed with {status}: {body}");
        }

        let completion: ChatCompletion = response.json().await?;
        Ok(completion)
    }
}
