//! `AuthUser` extractor: requires a logged-in session and yields its context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parlor_core::error::{AppError, ErrorKind};
use parlor_service::RequestContext;

use super::session::Session;
use crate::error::ApiError;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        let user_id = session
            .active_user()
            .ok_or_else(|| AppError::new(ErrorKind::AuthRequired, "Login required"))?;

        Ok(AuthUser(RequestContext::new(
            user_id,
            session.id().unwrap_or_default(),
        )))
    }
}
