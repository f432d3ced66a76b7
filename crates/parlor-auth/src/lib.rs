//! # parlor-auth
//!
//! Authentication building blocks for Parlor.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password policy enforcement
//! - `session`: server-side session records keyed by an opaque cookie id

pub mod password;
pub mod session;

pub use password::{PasswordHasher, PasswordValidator};
pub use session::{SessionData, SessionStore};
