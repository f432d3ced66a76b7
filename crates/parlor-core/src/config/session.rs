//! Cookie session configuration.

use serde::{Deserialize, Serialize};

/// Session cookie and store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Idle lifetime of a session, refreshed on every request.
    #[serde(default = "default_expiration")]
    pub expiration_minutes: u64,
    /// Upper bound on sessions held in memory.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    /// Mark the cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            expiration_minutes: default_expiration(),
            max_sessions: default_max_sessions(),
            secure_cookie: false,
        }
    }
}

fn default_cookie_name() -> String {
    "parlor_session".to_string()
}

fn default_expiration() -> u64 {
    60
}

fn default_max_sessions() -> u64 {
    100_000
}
