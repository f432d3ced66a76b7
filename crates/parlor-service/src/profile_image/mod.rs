//! Profile image lifecycle.

pub mod manager;

pub use manager::ProfileImageManager;
