use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::llm::ChatMessage;

/// Who a templated message speaks as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("missing value for prompt variable `{0}`")]
    MissingVariable(String),
}

/// A fixed sequence of message skeletons with `{placeholder}` variables.
/// Formatting substitutes the variables and yields ready-to-send messages.
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<(Role, String)>,
    input_variables: HashSet<String>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

impl ChatPromptTemplate {
    pub fn from_messages<S: Into<String>>(messages: impl IntoIterator<Item = (Role, S)>) -> Self {
        let messages: Vec<(Role, String)> = messages
            .into_iter()
            .map(|(role, template)| (role, template.into()))
            .collect();

        let input_variables = messages
            .iter()
            .flat_map(|(_, template)| {
                placeholder_regex()
                    .captures_iter(template)
                    .map(|caps| caps[1].to_string())
            })
            .collect();

        Self {
            messages,
            input_variables,
        }
    }

    /// The placeholder names appearing anywhere in the template.
    pub fn input_variables(&self) -> &HashSet<String> {
        &self.input_variables
    }

    /// Render the message list, substituting every placeholder from `values`.
    pub fn format(&self, values: &HashMap<String, String>) -> Result<Vec<ChatMessage>, PromptError> {
        for variable in &self.input_variables {
            if !values.contains_key(variable) {
                return Err(PromptError::MissingVariable(variable.clone()));
            }
        }

        let rendered = self
            .messages
            .iter()
            .map(|(role, template)| {
                let content = placeholder_regex()
                    .replace_all(template, |caps: &regex::Captures| values[&caps[1]].clone());
                ChatMessage::new(role.as_str(), content)
            })
            .collect();

        Ok(rendered)
    }
}
