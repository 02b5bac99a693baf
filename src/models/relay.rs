use serde::{ Deserialize, Serialize };

use crate::error::RelayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One entry in a conversation's ordered history: a role plus one text
/// segment, in the shape the chat client sends on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part { text: text.into() }],
        }
    }

    fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Raw relay body as posted by the client. Exactly one of the two
/// fields must be present and well-formed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AskBody {
    pub prompt: Option<String>,
    pub contents: Option<Vec<Turn>>,
}

/// A validated prompt payload: either a single prompt string or an
/// ordered turn sequence that is non-empty and ends with a user turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayRequest {
    Prompt(String),
    Turns(Vec<Turn>),
}

impl RelayRequest {
    pub fn from_body(body: AskBody) -> Result<Self, RelayError> {
        if let Some(prompt) = body.prompt {
            if prompt.trim().is_empty() {
                return Err(RelayError::InvalidRequest(
                    "'prompt' must be a non-empty string".to_string(),
                ));
            }
            return Ok(RelayRequest::Prompt(prompt));
        }

        if let Some(contents) = body.contents {
            if contents.is_empty() {
                return Err(RelayError::InvalidRequest(
                    "'contents' must not be empty".to_string(),
                ));
            }
            match contents.last() {
                Some(turn) if turn.role == Role::User => {}
                _ => {
                    return Err(RelayError::InvalidRequest(
                        "'contents' must end with a user turn".to_string(),
                    ));
                }
            }
            return Ok(RelayRequest::Turns(contents));
        }

        Err(RelayError::InvalidRequest(
            "body must carry either 'prompt' or 'contents'".to_string(),
        ))
    }

    /// Conversation view of the request. A bare prompt becomes a single
    /// user turn.
    pub fn turns(&self) -> Vec<Turn> {
        match self {
            RelayRequest::Prompt(text) => vec![Turn::user(text.clone())],
            RelayRequest::Turns(turns) => turns.clone(),
        }
    }

    /// Single-string view for providers that accept one input field.
    /// Turn sequences are flattened to role-tagged lines, the final
    /// line being the latest user turn.
    pub fn flattened(&self) -> String {
        match self {
            RelayRequest::Prompt(text) => text.clone(),
            RelayRequest::Turns(turns) => {
                let lines: Vec<String> = turns
                    .iter()
                    .map(|turn| {
                        let tag = match turn.role {
                            Role::User => "user",
                            Role::Model => "model",
                        };
                        format!("{}: {}", tag, turn.text())
                    })
                    .collect();
                lines.join("\n")
            }
        }
    }
}
