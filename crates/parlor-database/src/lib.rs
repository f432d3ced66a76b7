//! # parlor-database
//!
//! PostgreSQL connection management, the migration runner and the
//! [`UserStore`] capability with its implementations.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use migration::run_migrations;
#[cfg(any(test, feature = "memory"))]
pub use repositories::MemoryUserStore;
pub use repositories::{PgUserStore, UserStore};
