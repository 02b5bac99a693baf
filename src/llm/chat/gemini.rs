use serde_json::{ json, Value };

use super::{ non_empty_text, ProviderAdapter };
use crate::error::RelayError;
use crate::llm::ProviderConfig;
use crate::models::relay::RelayRequest;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini-style provider: `{ contents: Turn[] }` in, text at
/// `candidates[0].content.parts[0].text` out, API key in the query
/// string rather than a header.
pub struct GeminiAdapter {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key.as_deref().unwrap_or_default()
        )
    }

    fn build_request(&self, request: &RelayRequest) -> Value {
        json!({ "contents": request.turns() })
    }

    fn parse_response(&self, body: &Value) -> Result<String, RelayError> {
        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str);
        non_empty_text(text, body)
    }
}
