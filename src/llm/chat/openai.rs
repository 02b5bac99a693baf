use serde_json::{ json, Value };

use super::{ non_empty_text, ProviderAdapter };
use crate::error::RelayError;
use crate::llm::ProviderConfig;
use crate::models::relay::{ RelayRequest, Role };

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// OpenAI-style chat provider: `{ model, messages }` in with a fixed
/// system turn prepended, text at `choices[0].message.content` out.
pub struct OpenAIAdapter {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAIAdapter {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        match &self.api_key {
            Some(key) => vec![("authorization", format!("Bearer {}", key))],
            None => Vec::new(),
        }
    }

    fn build_request(&self, request: &RelayRequest) -> Value {
        let mut messages = vec![json!({ "role": "system", "content": SYSTEM_PROMPT })];
        for turn in request.turns() {
            let role = match turn.role {
                Role::User => "user",
                Role::Model => "assistant",
            };
            let content = turn
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            messages.push(json!({ "role": role, "content": content }));
        }
        json!({ "model": self.model, "messages": messages })
    }

    fn parse_response(&self, body: &Value) -> Result<String, RelayError> {
        let text = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str);
        non_empty_text(text, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::relay::Turn;

    fn adapter() -> OpenAIAdapter {
        OpenAIAdapter::from_config(&ProviderConfig {
            provider: crate::llm::ProviderType::OpenAI,
            api_key: Some("sk-test".to_string()),
            model: None,
            base_url: None,
        })
    }

    #[test]
    fn payload_prepends_the_system_turn_and_maps_model_to_assistant() {
        let request = RelayRequest::Turns(vec![Turn::user("hi"), Turn::model("hello"), Turn::user("more")]);
        let payload = adapter().build_request(&request);
        assert_eq!(
            payload,
            json!({
                "model": "gpt-4o",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "hello" },
                    { "role": "user", "content": "more" }
                ]
            })
        );
    }

    #[test]
    fn a_bare_prompt_becomes_one_user_message() {
        let payload = adapter().build_request(&RelayRequest::Prompt("hello".to_string()));
        assert_eq!(payload["messages"].as_array().unwrap().len(), 2);
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "hello");
    }

    #[test]
    fn parses_the_first_choice_content() {
        let body = json!({ "choices": [{ "message": { "role": "assistant", "content": "hi there" } }] });
        assert_eq!(adapter().parse_response(&body).unwrap(), "hi there");
    }

    #[test]
    fn a_missing_choice_is_a_shape_error() {
        let body = json!({ "choices": [] });
        let err = adapter().parse_response(&body).unwrap_err();
        assert_eq!(err.kind(), "unexpected_upstream_shape");
    }
}
