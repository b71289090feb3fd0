use anyhow::{anyhow, Result};

use crate::llm::ChatCompletion;

/// Extracts the plain-text content of a model reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl StrOutputParser {
    pub fn parse(&self, completion: ChatCompletion) -> Result<String> {
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("model reply contained no choices"))?;
        Ok(choice.message.content)
    }
}
