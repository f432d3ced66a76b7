//! Sign-up, login and password changes.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use parlor_auth::password::{PasswordHasher, PasswordValidator};
use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;
use parlor_database::repositories::UserStore;
use parlor_entity::user::{NewUser, User};

use crate::context::RequestContext;

/// Account operations that do not touch profile images.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    /// Register a new account.
    pub async fn sign_up(&self, name: &str, password: &str, birthdate: NaiveDate) -> AppResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        self.validator.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&NewUser {
                name: name.to_string(),
                password_hash,
                birthdate,
            })
            .await?;

        info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Check credentials. Unknown names and wrong passwords are both `LoginFail`.
    pub async fn login(&self, name: &str, password: &str) -> AppResult<User> {
        let login_fail = || AppError::new(ErrorKind::LoginFail, "Invalid name or password");

        let Some(user) = self.users.find_by_name(name.trim()).await? else {
            warn!("Login attempt for unknown user");
            return Err(login_fail());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(login_fail());
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// The acting user's row.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Replace the acting user's password after checking the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_profile(ctx).await?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::new(
                ErrorKind::PasswordsMismatch,
                "Current password is incorrect",
            ));
        }
        self.validator.validate(new_password)?;

        let password_hash = self.hasher.hash_password(new_password)?;
        self.users
            .update_password(ctx.user_id, &password_hash)
            .await?;

        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }
}
