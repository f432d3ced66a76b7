//! Wire shape of error bodies.

use serde::{Deserialize, Serialize};

/// Error body sent to clients for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code, see [`crate::ErrorKind::code`].
    pub error: String,
    /// Human-readable message.
    pub message: String,
}
