use std::sync::Arc;

use crate::chain::{translation_chain, Chain};
use crate::config::Config;
use crate::llm::GroqChat;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub chain: Arc<Chain>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let model = Arc::new(GroqChat::new(&config.groq));
        let chain = Arc::new(translation_chain(model));
        Self { config, chain }
    }
}
