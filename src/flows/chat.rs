use super::Backends;
use crate::{
    device::RequestSource,
    gateway::{ChatMessage, LogoutRequest},
    session::{transitions, Transition},
    store::CredentialStore,
};
use std::sync::Arc;
use tracing::warn;

/// Assistant turn recorded when the chat service answers without text.
pub const EMPTY_REPLY: &str = "[[No response from server]]";
/// Assistant turn recorded when the chat request fails.
pub const UNREACHABLE_REPLY: &str = "[[Error: Could not reach server]]";

/// One conversation. History lives only here; the chat service keeps none.
#[derive(Debug)]
pub struct ChatSession {
    store: Arc<CredentialStore>,
    backends: Backends,
    history: Vec<ChatMessage>,
    first_visit: bool,
}

impl ChatSession {
    #[must_use]
    pub fn open(store: Arc<CredentialStore>, backends: Backends) -> Self {
        let first_visit = store.take_intro();
        Self {
            store,
            backends,
            history: Vec::new(),
            first_visit,
        }
    }

    /// `true` only for the first chat opened in this tab.
    #[must_use]
    pub fn first_visit(&self) -> bool {
        self.first_visit
    }

    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Starts a new conversation.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Sends one turn with the full history. Blank input is ignored. Failures
    /// become an assistant turn; nothing is returned as an error.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.history.push(ChatMessage::user(input));
        let token = self.store.get_token();
        let reply = match self
            .backends
            .chat
            .send(token.as_ref(), &self.history, input)
            .await
        {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_REPLY.to_string(),
            Err(err) => {
                warn!("Chat request failed: {err}");
                UNREACHABLE_REPLY.to_string()
            }
        };
        self.history.push(ChatMessage::assistant(reply));
        self.history.last()
    }

    pub async fn sign_out(self) -> Transition {
        sign_out(&self.store, &self.backends).await
    }
}

/// Best-effort backend notice, then the local session is cleared no matter
/// what the network did.
pub async fn sign_out(store: &CredentialStore, backends: &Backends) -> Transition {
    let token = store.get_token();
    let request = LogoutRequest {
        device: backends.device.local().metadata(RequestSource::Unlabeled),
    };
    if let Err(err) = backends.auth.logout(token.as_ref(), &request).await {
        warn!("Signout notification failed: {err}");
    }
    transitions::signed_out(store)
}
