pub mod gemini;
pub mod huggingface;
pub mod openai;

use serde_json::Value;
use std::sync::Arc;

use self::gemini::GeminiAdapter;
use self::huggingface::HuggingFaceAdapter;
use self::openai::OpenAIAdapter;
use super::{ ProviderConfig, ProviderType };
use crate::error::RelayError;
use crate::models::relay::RelayRequest;

/// One upstream completion API hidden behind a uniform build/parse
/// pair. The relay handler never branches on which provider is active:
/// swapping providers changes the wire payload, not the control flow.
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn has_credentials(&self) -> bool;

    /// Full URL of the provider's completion endpoint.
    fn endpoint(&self) -> String;

    /// Extra request headers, typically bearer auth.
    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Provider wire payload for a normalized relay request.
    fn build_request(&self, request: &RelayRequest) -> Value;

    /// Extract the completion text from a 2xx upstream body.
    fn parse_response(&self, body: &Value) -> Result<String, RelayError>;
}

pub fn new_adapter(config: &ProviderConfig) -> Arc<dyn ProviderAdapter> {
    match config.provider {
        ProviderType::Gemini => Arc::new(GeminiAdapter::from_config(config)),
        ProviderType::HuggingFace => Arc::new(HuggingFaceAdapter::from_config(config)),
        ProviderType::OpenAI => Arc::new(OpenAIAdapter::from_config(config)),
    }
}

/// A 2xx body whose text is missing, mistyped, or empty is a shape
/// error carrying the raw body for diagnosis; it is never surfaced to
/// the client as if it were a valid answer.
pub(crate) fn non_empty_text(text: Option<&str>, raw: &Value) -> Result<String, RelayError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(RelayError::UnexpectedUpstreamShape { raw: raw.clone() }),
    }
}
