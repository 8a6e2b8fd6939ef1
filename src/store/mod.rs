//! Credential store: the only owner of the session token, the cached profile
//! and the flow markers. It is injected into every gate and page controller;
//! nothing else reads storage directly.
//!
//! Durable writes are broadcast on the [`Origin`] channel. Other tabs apply
//! those events to their in-memory session without writing storage back, so
//! there is no feedback loop. Delivery is eventually consistent and the last
//! write wins.

mod markers;
mod scope;

pub use markers::{FlowMarker, ResetFlowMarker, SignupFlowMarker};
pub use scope::{FileScope, MemoryScope, StorageScope};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};
use ulid::Ulid;

/// Storage key names. One canonical session key is used everywhere.
pub mod keys {
    pub const TOKEN: &str = "auth_token";
    pub const USER: &str = "user";
    pub const OTP_PENDING: &str = "otp_pending";
    pub const SIGNUP_EMAIL: &str = "signup_email";
    pub const OTP_LAST_SENT_AT: &str = "otp_last_sent_at";
    pub const RESET_TOKEN: &str = "reset_token";
    pub const INTRO_SHOWN: &str = "intro_shown";
}

const EVENT_CAPACITY: usize = 64;

/// In-memory view of the session as the current tab sees it.
#[derive(Clone, Debug, Default)]
pub enum SessionState {
    /// Durable storage has not been read yet.
    #[default]
    Loading,
    Anonymous,
    Active(SecretString),
}

impl SessionState {
    fn from_token(token: Option<String>) -> Self {
        match normalize_token(token.as_deref()) {
            Some(token) => Self::Active(SecretString::from(token)),
            None => Self::Anonymous,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Durable mutation notice, delivered to every tab except the writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    pub source: Ulid,
    pub key: String,
    pub new_value: Option<String>,
}

/// Profile cached for display only; never consulted for access control.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The durable scope shared by every tab of one origin.
#[derive(Clone, Debug)]
pub struct Origin {
    durable: Arc<dyn StorageScope>,
    events: broadcast::Sender<StorageEvent>,
}

impl Origin {
    #[must_use]
    pub fn new(durable: Arc<dyn StorageScope>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { durable, events }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryScope::new()))
    }

    /// Opens a tab. The store starts in `Loading` until [`CredentialStore::hydrate`].
    #[must_use]
    pub fn open_tab(&self, ephemeral: Arc<dyn StorageScope>) -> CredentialStore {
        let (state, _) = watch::channel(SessionState::Loading);
        CredentialStore {
            tab_id: Ulid::new(),
            origin: self.clone(),
            ephemeral,
            state,
        }
    }

    fn publish(&self, source: Ulid, key: &str, new_value: Option<&str>) {
        // No subscribers just means no other tab is open.
        let _ = self.events.send(StorageEvent {
            source,
            key: key.to_string(),
            new_value: new_value.map(str::to_string),
        });
    }
}

#[derive(Debug)]
pub struct CredentialStore {
    tab_id: Ulid,
    origin: Origin,
    ephemeral: Arc<dyn StorageScope>,
    state: watch::Sender<SessionState>,
}

impl CredentialStore {
    #[must_use]
    pub fn tab_id(&self) -> Ulid {
        self.tab_id
    }

    /// The single initial read of durable storage.
    pub fn hydrate(&self) {
        let state = SessionState::from_token(self.origin.durable.get(keys::TOKEN));
        debug!(
            tab = %self.tab_id,
            authenticated = state.is_authenticated(),
            "Hydrated session from durable storage"
        );
        self.state.send_replace(state);
    }

    #[must_use]
    pub fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Change notifications for this tab's session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Reads the token from durable storage; blank values count as absent.
    #[must_use]
    pub fn get_token(&self) -> Option<SecretString> {
        normalize_token(self.origin.durable.get(keys::TOKEN).as_deref()).map(SecretString::from)
    }

    /// Persists the token and notifies same-tab subscribers before returning.
    /// A blank token is never stored; it clears the session instead.
    pub fn set_token(&self, token: &str) {
        let Some(token) = normalize_token(Some(token)) else {
            warn!("Refusing to store an empty session token; clearing session");
            self.clear_session();
            return;
        };

        self.origin.durable.set(keys::TOKEN, &token);
        self.origin.publish(self.tab_id, keys::TOKEN, Some(&token));
        self.state.send_replace(SessionState::Active(SecretString::from(token)));
    }

    /// Removes the token and cached profile and wipes this tab's markers.
    pub fn clear_session(&self) {
        self.origin.durable.remove(keys::TOKEN);
        self.origin.durable.remove(keys::USER);
        self.ephemeral.clear();
        self.origin.publish(self.tab_id, keys::TOKEN, None);
        self.origin.publish(self.tab_id, keys::USER, None);
        self.state.send_replace(SessionState::Anonymous);
    }

    pub fn cache_profile(&self, profile: &UserProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => {
                self.origin.durable.set(keys::USER, &json);
                self.origin.publish(self.tab_id, keys::USER, Some(&json));
            }
            Err(err) => warn!("Failed to encode user profile: {err}"),
        }
    }

    #[must_use]
    pub fn cached_profile(&self) -> Option<UserProfile> {
        let json = self.origin.durable.get(keys::USER)?;
        serde_json::from_str(&json).ok()
    }

    /// Applies another tab's durable write to the in-memory session. Events
    /// from this tab and for other keys are ignored. Storage is not touched.
    ///
    /// Returns `true` when the session changed.
    pub fn apply_storage_event(&self, event: &StorageEvent) -> bool {
        if event.source == self.tab_id || event.key != keys::TOKEN {
            return false;
        }

        let next = SessionState::from_token(event.new_value.clone());
        let changed = self.state.send_if_modified(|current| {
            let differs = match (&*current, &next) {
                (SessionState::Active(a), SessionState::Active(b)) => {
                    a.expose_secret() != b.expose_secret()
                }
                (SessionState::Anonymous, SessionState::Anonymous) => false,
                _ => true,
            };
            if differs {
                *current = next.clone();
            }
            differs
        });

        if changed {
            debug!(
                tab = %self.tab_id,
                source = %event.source,
                authenticated = next.is_authenticated(),
                "Applied cross-tab session change"
            );
        }
        changed
    }

    /// Spawns the listener that keeps this tab in sync with the others. The
    /// task ends once the store is dropped.
    #[must_use]
    pub fn spawn_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.origin.events.subscribe();
        let store: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let received = events.recv().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                match received {
                    Ok(event) => {
                        store.apply_storage_event(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed storage events; re-reading durable storage");
                        store.hydrate();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    pub(crate) fn ephemeral(&self) -> &dyn StorageScope {
        self.ephemeral.as_ref()
    }
}

fn normalize_token(token: Option<&str>) -> Option<String> {
    let token = token?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
