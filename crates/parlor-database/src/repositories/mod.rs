//! User persistence.
//!
//! [`UserStore`] is the seam the service layer depends on. [`PgUserStore`]
//! backs it with PostgreSQL; [`MemoryUserStore`] (feature `memory`) keeps
//! rows in process for tests.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod user;

use async_trait::async_trait;

use parlor_core::result::AppResult;
use parlor_core::types::{ImageId, UserId};
use parlor_entity::user::{NewUser, ProfileChanges, ProfileUpdate, User};

#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryUserStore;
pub use user::PgUserStore;

/// Storage capability for user rows.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. Fails `UserNameAlreadyExists` when the name is taken.
    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by login name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// The image set currently referenced by the user, if any.
    async fn current_image_id(&self, id: UserId) -> AppResult<Option<ImageId>>;

    /// Apply `changes` in one transaction.
    ///
    /// When the image reference is among the changes, the previous value is
    /// read under a row lock inside the same transaction and returned with
    /// the updated row. Fails `NoUpdatesToPerform` on empty changes,
    /// `UserNameAlreadyExists` on a name clash and `NotFound` for an unknown id.
    async fn update_profile(&self, id: UserId, changes: &ProfileChanges)
    -> AppResult<ProfileUpdate>;

    /// Replace the password hash of exactly one user.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()>;
}
