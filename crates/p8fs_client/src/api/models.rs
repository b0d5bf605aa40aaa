//! Request and stream-chunk models for the chat completion endpoint.

use serde::{Deserialize, Serialize};

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a streaming chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
}

impl ChatCompletionRequest {
    /// A streaming request with the default temperature.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        ChatCompletionRequest {
            model: model.into(),
            messages,
            stream: true,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// One incremental content fragment decoded from the stream.
///
/// Ephemeral: consumed by the caller (typically appended to an output
/// buffer) and discarded. Empty fragments are never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDelta {
    pub content: String,
}

/// One parsed `data:` payload in the upstream OpenAI-compatible format.
/// Unknown fields are ignored; only the content path matters here.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionStreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionStreamChunk {
    /// Extract `choices[0].delta.content`, if present and non-empty.
    pub fn content_fragment(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
    }
}
