//! Server-side sessions.

pub mod model;
pub mod store;

pub use model::SessionData;
pub use store::SessionStore;
