//! # parlor-service
//!
//! Business logic for Parlor. Services receive their collaborators at
//! construction time as `Arc` handles and are cheap to clone.

pub mod context;
pub mod profile_image;
pub mod user;

#[cfg(test)]
mod test_support;

pub use context::RequestContext;
pub use profile_image::ProfileImageManager;
pub use user::{NewProfileImage, ProfileCoordinator, ProfileFields, UserService};
