//! User entity and its write models.

pub mod model;

pub use model::{NewUser, ProfileChanges, ProfileUpdate, User};
