//! Session/flow state machine: which page-level flow a visitor may reach and
//! how backend responses move them between flows.
//!
//! The machine is deliberately stateless apart from the current page. Gates
//! read the credential store on every navigation, so a change made by another
//! tab or by a transition is picked up the next time anyone navigates.

mod countdown;
mod guards;
mod machine;
mod route;
pub mod transitions;

pub use countdown::{resend_cooldown, Countdown, DEFAULT_LOCKOUT_SECS, RESEND_COOLDOWN_SECS};
pub use guards::{evaluate, flow_gate, otp_gate, protected_gate, GateDecision, RESET_TOKEN_PARAM};
pub use machine::{Navigation, SessionMachine};
pub use route::{Location, Route};
pub use transitions::Transition;
