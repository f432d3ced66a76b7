//! Core type definitions shared across the Parlor workspace.

pub mod id;
pub mod response;

pub use id::*;
pub use response::ApiErrorResponse;
