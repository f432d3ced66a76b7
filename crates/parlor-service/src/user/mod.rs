//! Account and profile operations.

pub mod profile;
pub mod service;

pub use profile::{NewProfileImage, ProfileCoordinator, ProfileFields};
pub use service::UserService;
