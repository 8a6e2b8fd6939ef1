use super::{
    api::ApiClient,
    types::{ChatMessage, ChatRequest, ChatResponse},
};
use crate::error::AppError;
use secrecy::SecretString;
use tracing::{debug, instrument};

/// Chat turns are stateless on the server; every request carries the whole
/// conversation so far.
#[derive(Clone, Debug)]
pub struct ChatClient {
    api: ApiClient,
}

impl ChatClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `messages` must already end with the user's turn for `prompt`.
    /// Returns `None` when the reply carries no text.
    ///
    /// # Errors
    /// Transport failures, non-2xx responses and undecodable bodies.
    #[instrument(skip_all, fields(turns = messages.len()))]
    pub async fn send(
        &self,
        bearer: Option<&SecretString>,
        messages: &[ChatMessage],
        prompt: &str,
    ) -> Result<Option<String>, AppError> {
        let response: ChatResponse = self
            .api
            .post_json("/v1/chat", &ChatRequest { messages, prompt }, bearer)
            .await?;
        let text = response.text.filter(|text| !text.is_empty());
        debug!(empty = text.is_none(), "Chat service replied");
        Ok(text)
    }
}
