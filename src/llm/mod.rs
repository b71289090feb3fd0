pub mod groq;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use groq::GroqChat;

/// One message in a chat conversation, in the wire format the
/// chat-completions API expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Response body of a chat-completions call.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub id: Option<String>,
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Interface for a stateless chat-completion model. Stateless means the
/// model stores no memory or system prompt between calls; every call
/// carries the full message list.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat_completion(&self, messages: Vec<ChatMessage>)
        -> anyhow::Result<ChatCompletion>;
}
