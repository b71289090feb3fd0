use std::env;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub groq: GroqConfig,
}

#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Config {
    /// Read configuration from the environment. The API key is required;
    /// everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GROQ_API_KEY").context("GROQ_API_KEY is not set")?;
        let base_url = env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = match env::var("GROQ_TEMPERATURE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("GROQ_TEMPERATURE is not a number: {raw}"))?,
            Err(_) => 1.0,
        };

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => 8000,
        };

        Ok(Self {
            host,
            port,
            groq: GroqConfig {
                api_key,
                base_url,
                model,
                temperature,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            groq: GroqConfig::default(),
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
        }
    }
}
