use serde_json::{ json, Value };

use super::{ non_empty_text, ProviderAdapter };
use crate::error::RelayError;
use crate::llm::ProviderConfig;
use crate::models::relay::RelayRequest;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "deepseek-ai/deepseek-coder-6.7b-instruct";

/// Hugging-Face-style inference provider: `{ inputs: <prompt> }` in,
/// text at `[0].generated_text` out. Turn sequences are flattened to a
/// single role-tagged prompt string before sending.
pub struct HuggingFaceAdapter {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl HuggingFaceAdapter {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl ProviderAdapter for HuggingFaceAdapter {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        match &self.api_key {
            Some(key) => vec![("authorization", format!("Bearer {}", key))],
            None => Vec::new(),
        }
    }

    fn build_request(&self, request: &RelayRequest) -> Value {
        json!({ "inputs": request.flattened() })
    }

    fn parse_response(&self, body: &Value) -> Result<String, RelayError> {
        let text = body.pointer("/0/generated_text").and_then(Value::as_str);
        non_empty_text(text, body)
    }
}
