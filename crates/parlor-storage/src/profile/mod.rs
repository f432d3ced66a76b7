//! Filesystem layout of profile images.
//!
//! ```text
//! <root>/original/<id>
//! <root>/active/{jpeg,png,webp}/<id>
//! <root>/archive/{jpeg,png,webp}/<id>
//! ```
//!
//! File names are the bare image id, without extension.

pub mod store;

pub use store::{Lifecycle, ProfileImageStore};
