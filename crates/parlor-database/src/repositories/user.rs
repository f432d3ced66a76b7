//! PostgreSQL user store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error};

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;
use parlor_core::types::{ImageId, UserId};
use parlor_entity::user::{NewUser, ProfileChanges, ProfileUpdate, User};

use super::UserStore;

const NAME_CONSTRAINT: &str = "users_name_key";
const UNIQUE_VIOLATION: &str = "23505";

/// [`UserStore`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a write failure, recognising a clash on the unique name.
fn map_write_error(e: sqlx::Error, name: Option<&str>, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some(NAME_CONSTRAINT)
                || db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
        {
            AppError::new(
                ErrorKind::UserNameAlreadyExists,
                format!("User name '{}' already exists", name.unwrap_or_default()),
            )
        }
        _ => {
            error!(error = %e, operation = context, "Database write failed");
            AppError::with_source(ErrorKind::DatabaseServerFail, context, e)
        }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!(error = %e, operation = context, "Database query failed");
        AppError::with_source(ErrorKind::DatabaseServerFail, context, e)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, password_hash, birthdate) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.birthdate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(&user.name), "Failed to create user"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by name"))
    }

    async fn current_image_id(&self, id: UserId) -> AppResult<Option<ImageId>> {
        let row: Option<Option<ImageId>> =
            sqlx::query_scalar("SELECT profile_picture_id FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to read current image id"))?;

        row.ok_or_else(|| AppError::not_found(format!("User {id} not found")))
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

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let previous_image_id = if changes.changes_image() {
            let row: Option<Option<ImageId>> = sqlx::query_scalar(
                "SELECT profile_picture_id FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to lock user row"))?;
            row.ok_or_else(|| AppError::not_found(format!("User {id} not found")))?
        } else {
            None
        };

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
        {
            let mut set = query.separated(", ");
            if let Some(name) = &changes.name {
                set.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(birthdate) = changes.birthdate {
                set.push("birthdate = ").push_bind_unseparated(birthdate);
            }
            if let Some(image_id) = changes.profile_picture_id {
                set.push("profile_picture_id = ")
                    .push_bind_unseparated(image_id);
            }
            set.push("updated_at = NOW()");
        }
        query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let user = query
            .build_query_as::<User>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, changes.name.as_deref(), "Failed to update user"))?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit profile update"))?;

        debug!(user_id = %id, previous_image_id = ?previous_image_id, "Profile updated");
        Ok(ProfileUpdate {
            user,
            previous_image_id,
        })
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}
