//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};

use parlor_core::types::UserId;

/// Who is acting, passed explicitly into service methods.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The session the request arrived on.
    pub session_id: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            request_time: Utc::now(),
        }
    }
}
