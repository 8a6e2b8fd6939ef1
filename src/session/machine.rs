use super::{
    guards::{self, GateDecision, RESET_TOKEN_PARAM},
    route::{Location, Route},
    transitions::Transition,
};
use crate::store::CredentialStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gates only ever redirect to public pages, so chains stay short.
const MAX_REDIRECTS: usize = 4;

/// Result of one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    /// Decision of the gate guarding the requested route.
    pub decision: GateDecision,
    /// Page actually shown; `None` while suspended.
    pub landed: Option<Route>,
}

impl Navigation {
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.decision == GateDecision::Allow
    }
}

/// Re-evaluates the gates on every navigation; the only remembered state is
/// the page currently shown.
#[derive(Debug)]
pub struct SessionMachine {
    store: Arc<CredentialStore>,
    current: Option<Route>,
}

impl SessionMachine {
    #[must_use]
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.current
    }

    pub fn navigate(&mut self, location: &Location) -> Navigation {
        let requested = location.route();
        let mut first_decision = None;
        let mut target = location.clone();

        for _ in 0..MAX_REDIRECTS {
            let decision = guards::evaluate(&self.store, &target);
            let first = *first_decision.get_or_insert(decision);

            match decision {
                GateDecision::Allow => {
                    self.enter(&target);
                    self.current = Some(target.route());
                    return Navigation {
                        requested,
                        decision: first,
                        landed: self.current,
                    };
                }
                GateDecision::Suspend => {
                    debug!(route = %target.route(), "Session still loading; suspending");
                    return Navigation {
                        requested,
                        decision: first,
                        landed: None,
                    };
                }
                GateDecision::Redirect(next) => {
                    debug!(from = %target.route(), to = %next, "Gate redirected");
                    target = Location::new(next);
                }
            }
        }

        warn!(route = %requested, "Redirect chain too long; staying put");
        Navigation {
            requested,
            decision: first_decision.unwrap_or(GateDecision::Suspend),
            landed: None,
        }
    }

    /// Waits out the transition delay, then navigates.
    pub async fn follow(&mut self, transition: Transition) -> Navigation {
        if !transition.delay.is_zero() {
            tokio::time::sleep(transition.delay).await;
        }
        self.navigate(&Location::new(transition.to))
    }

    /// Page-entry side effects.
    fn enter(&self, location: &Location) {
        if location.route() == Route::ResetPassword {
            if let Some(token) = location.query(RESET_TOKEN_PARAM) {
                self.store.store_reset_token(token);
                debug!("Stored reset token from link");
            }
        }
    }
}
