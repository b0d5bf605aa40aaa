//! Chat completion client.
//!
//! Opens the streaming completion endpoint with a bearer token taken from
//! a session record (or handed in directly) and exposes the response as a
//! stream of content deltas.

use futures_util::Stream;
use log::{error, info};
use reqwest::Client;

use crate::api::models::{ChatCompletionRequest, ChatDelta};
use crate::api::stream::delta_stream;
use crate::config::Config;
use crate::error::ClientError;
use crate::session::SessionRecord;

/// Client for `POST /api/v1/agent/{agent}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl ChatClient {
    /// Build a client around an access token. The whole streaming exchange
    /// is bounded by `config.stream_timeout`.
    pub fn new(config: &Config, access_token: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.stream_timeout).build()?;
        Ok(ChatClient {
            client,
            base_url: config.base_url.clone(),
            access_token: access_token.into(),
        })
    }

    /// Build a client authorized by a previously persisted session record.
    pub fn from_record(config: &Config, record: &SessionRecord) -> Result<Self, ClientError> {
        Self::new(config, record.access_token.clone())
    }

    /// Open a streaming chat completion against the given agent.
    ///
    /// A non-success status is a hard failure carrying the status and raw
    /// body; the decoder is never invoked for such responses. On success
    /// the returned stream lazily yields one [`ChatDelta`] per decoded
    /// event and terminates on the `[DONE]` sentinel or end of input.
    pub async fn stream_chat_completion(
        &self,
        agent: &str,
        request: &ChatCompletionRequest,
    ) -> Result<impl Stream<Item = Result<ChatDelta, ClientError>>, ClientError> {
        let url = format!("{}/api/v1/agent/{agent}/chat/completions", self.base_url);
        info!(
            "Streaming completion from {agent} with {} messages",
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat completion request failed with status {status}: {body}");
            return Err(ClientError::CompletionRejected { status, body });
        }

        Ok(delta_stream(response.bytes_stream()))
    }
}
