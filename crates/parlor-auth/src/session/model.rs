//! Session record.

use parlor_core::types::UserId;

/// Values held for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    /// Authenticated user, once logged in.
    pub user_id: Option<UserId>,
    /// Whether the session belongs to a logged-in user.
    pub logged_in: bool,
}

impl SessionData {
    /// A session for a freshly authenticated user.
    pub fn logged_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            logged_in: true,
        }
    }

    /// The logged-in user, if any.
    pub fn active_user(&self) -> Option<UserId> {
        if self.logged_in { self.user_id } else { None }
    }
}
