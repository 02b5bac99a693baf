pub mod chat;

use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;

use crate::cli::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    HuggingFace,
    OpenAI,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderType::Gemini => "gemini",
            ProviderType::HuggingFace => "huggingface",
            ProviderType::OpenAI => "openai",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseProviderTypeError {
    message: String,
}

impl fmt::Display for ParseProviderTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseProviderTypeError {}

impl FromStr for ProviderType {
    type Err = ParseProviderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderType::Gemini),
            "huggingface" => Ok(ProviderType::HuggingFace),
            "openai" => Ok(ProviderType::OpenAI),
            _ =>
                Err(ParseProviderTypeError {
                    message: format!("Invalid provider type: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn from_args(args: &Args) -> Result<Self, ParseProviderTypeError> {
        Ok(Self {
            provider: args.chat_llm_type.parse()?,
            api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
            model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
        })
    }
}
