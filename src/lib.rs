//! # Chatgate (session gatekeeping for an authenticated AI chat)
//!
//! `chatgate` owns the client side of a small auth + chat product: it decides
//! which page-level flow a visitor may reach, keeps the session token and the
//! short-lived flow markers, and talks to two external REST services (an auth
//! service and a chat service).
//!
//! ## Storage Model
//!
//! Two persistence scopes back every decision:
//!
//! - **Durable** (one per origin): the session token and a cached user profile.
//!   Writes are broadcast to every other tab of the same origin so a login in one
//!   tab is observed by the others without a reload.
//! - **Ephemeral** (one per tab): flow markers for the signup verification and
//!   password reset processes.
//!
//! ## Gates
//!
//! Gates are re-evaluated on every navigation; no explicit state value is
//! persisted. The chat route requires a non-empty durable token, OTP verification
//! requires the pending-OTP marker, and the reset page requires either a URL token
//! or a stored reset marker.
//!
//! ## Gateways
//!
//! Auth responses are decoded exactly once into [`gateway::AuthOutcome`]; callers
//! branch on the variant rather than on HTTP status. There are no automatic
//! retries: one request per user action.

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod flows;
pub mod gateway;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{AppError, ValidationError};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
