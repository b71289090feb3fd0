use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::future::try_join_all;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::llm::ChatModel;
use crate::parser::StrOutputParser;
use crate::prompt::{ChatPromptTemplate, Role};

/// Input to the translation chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInput {
    pub language: String,
    pub text: String,
}

/// The composed pipeline: prompt template -> chat model -> output parser.
pub struct Chain {
    prompt: ChatPromptTemplate,
    model: Arc<dyn ChatModel>,
    parser: StrOutputParser,
}

/// Build the translation chain over the given model.
pub fn translation_chain(model: Arc<dyn ChatModel>) -> Chain {
    let prompt = ChatPromptTemplate::from_messages([
        (Role::User, "{text}"),
        (Role::System, "Translate the following text to: {language}"),
    ]);
    Chain::new(prompt, model, StrOutputParser)
}

impl Chain {
    pub fn new(prompt: ChatPromptTemplate, model: Arc<dyn ChatModel>, parser: StrOutputParser) -> Self {
        Self {
            prompt,
            model,
            parser,
        }
    }

    /// Run the pipeline once: render the prompt, call the model, parse the reply.
    pub async fn invoke(&self, input: &ChainInput) -> Result<String> {
        let values = HashMap::from([
            ("language".to_string(), input.language.clone()),
            ("text".to_string(), input.text.clone()),
        ]);
        let messages = self.prompt.format(&values)?;
        let completion = self.model.chat_completion(messages).await?;
        self.parser.parse(completion)
    }

    /// Run the pipeline over several inputs concurrently. Outputs come back
    /// in input order; the first failure aborts the whole batch.
    pub async fn batch(&self, inputs: &[ChainInput]) -> Result<Vec<String>> {
        try_join_all(inputs.iter().map(|input| self.invoke(input))).await
    }

    /// Run the pipeline and emit the output as a chunk stream. The upstream
    /// call is not streamed; the finished reply is re-chunked on whitespace
    /// so clients still receive incremental events.
    pub async fn stream(&self, input: &ChainInput) -> Result<BoxStream<'static, String>> {
        let output = self.invoke(input).await?;
        let chunks: Vec<String> = output
            .split_inclusive(char::is_whitespace)
            .map(str::to_string)
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}
