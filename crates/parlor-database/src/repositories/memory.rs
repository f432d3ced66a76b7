//! In-process user store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;
use parlor_core::types::{ImageId, UserId};
use parlor_entity::user::{NewUser, ProfileChanges, ProfileUpdate, User};

use super::UserStore;

/// [`UserStore`] holding rows in a map. The write lock stands in for the
/// row lock and transaction of the PostgreSQL store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(name: &str) -> AppError {
    AppError::new(
        ErrorKind::UserNameAlreadyExists,
        format!("User name '{name}' already exists"),
    )
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.name == user.name) {
            return Err(name_taken(&user.name));
        }

        let now = Utc::now();
        let row = User {
            id: UserId::new(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            birthdate: user.birthdate,
            profile_picture_id: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.name == name)
            .cloned())
    }

    async fn current_image_id(&self, id: UserId) -> AppResult<Option<ImageId>> {
        self.users
            .read()
            .await
            .get(&id)
            .map(|u| u.profile_picture_id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> AppResult<ProfileUpdate> {
        if changes.is_empty() {
            return Err(AppError::new(
                ErrorKind::NoUpdatesToPerform,
                "No profile fields to update",
            ));
        }

        let mut users = self.users.write().await;
        if let Some(name) = &changes.name {
            if users.values().any(|u| u.id != id && &u.name == name) {
                return Err(name_taken(name));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        let previous_image_id = if changes.changes_image() {
            user.profile_picture_id
        } else {
            None
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(birthdate) = changes.birthdate {
            user.birthdate = birthdate;
        }
        if let Some(image_id) = changes.profile_picture_id {
            user.profile_picture_id = Some(image_id);
        }
        user.updated_at = Utc::now();

        Ok(ProfileUpdate {
            user: user.clone(),
            previous_image_id,
        })
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}
