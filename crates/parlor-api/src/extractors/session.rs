//! Per-request handle on the caller's server-side session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parlor_auth::SessionData;
use parlor_core::error::AppError;
use parlor_core::types::UserId;

use crate::error::ApiError;

/// The session loaded by the session middleware for this request.
///
/// Handlers change it through this handle; the middleware writes the result
/// back to the store once the handler returns.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    id: Option<String>,
    data: SessionData,
    /// Ids dropped by a login, so a pre-login id never carries the user.
    retired: Option<String>,
    dirty: bool,
    destroyed: bool,
}

/// What the middleware must do with the session after the handler ran.
#[derive(Debug, PartialEq)]
pub(crate) enum SessionOutcome {
    /// No session existed and none was started.
    Untouched,
    /// Save `data` under `id`, minting an id when `None`.
    Save {
        id: Option<String>,
        data: SessionData,
        retired: Option<String>,
    },
    /// Remove these ids and expire the cookie.
    Destroy { ids: Vec<String> },
}

impl Session {
    /// Wrap a session loaded from the store.
    pub(crate) fn loaded(id: String, data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id: Some(id),
                data,
                ..SessionState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Session id, if the caller already holds one.
    pub fn id(&self) -> Option<String> {
        self.lock().id.clone()
    }

    /// The logged-in user, if any.
    pub fn active_user(&self) -> Option<UserId> {
        let state = self.lock();
        if state.destroyed {
            return None;
        }
        state.data.active_user()
    }

    /// Mark `user_id` as logged in. The session gets a fresh id.
    pub fn log_in(&self, user_id: UserId) {
        let mut state = self.lock();
        if let Some(old) = state.id.take() {
            state.retired = Some(old);
        }
        state.data = SessionData::logged_in(user_id);
        state.dirty = true;
        state.destroyed = false;
    }

    /// End the session.
    pub fn destroy(&self) {
        let mut state = self.lock();
        state.data = SessionData::default();
        state.destroyed = true;
    }

    pub(crate) fn outcome(&self) -> SessionOutcome {
        let state = self.lock();
        if state.destroyed {
            let ids = state.id.iter().chain(state.retired.iter()).cloned().collect();
            return SessionOutcome::Destroy { ids };
        }
        if state.id.is_none() && !state.dirty {
            return SessionOutcome::Untouched;
        }
        SessionOutcome::Save {
            id: state.id.clone(),
            data: state.data.clone(),
            retired: state.retired.clone(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::internal("Session middleware is not installed")))
    }
}
