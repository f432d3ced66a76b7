//! # parlor-api
//!
//! HTTP API layer for Parlor built on Axum.
//!
//! Every request passes through the session middleware, which loads the
//! caller's session from its cookie and writes it back after the handler
//! ran. Handlers receive it explicitly through the [`Session`] and
//! [`AuthUser`] extractors.
//!
//! [`Session`]: extractors::Session
//! [`AuthUser`]: extractors::AuthUser

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
