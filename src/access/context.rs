//! Explicitly passed session context.
//!
//! One [`SessionContext`] is created per client and cloned into whoever
//! needs it. Readers get snapshots; only [`SessionContext::establish`] and
//! [`SessionContext::clear`] change it. The lock is never held across an
//! await point.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{Session, UserProfile};

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Marks the session as signed in with `profile`.
    pub fn establish(&self, profile: UserProfile) {
        tracing::debug!(email = %profile.email, "session established");
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            Session::Authenticated(profile);
    }

    /// Forgets the session.
    pub fn clear(&self) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if session.is_authenticated() {
            tracing::debug!("session cleared");
        }
        *session = Session::Anonymous;
    }

    pub(crate) fn apply(&self, session: Session) {
        match session {
            Session::Authenticated(profile) => self.establish(profile),
            Session::Anonymous => self.clear(),
        }
    }
}
