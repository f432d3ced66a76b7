//! User entity model.

use chrono::{DateTime, NaiveDate, Utc};
use parlor_core::types::{ImageId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered Parlor user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Date of birth.
    pub birthdate: NaiveDate,
    /// Currently referenced profile image set, if any.
    pub profile_picture_id: Option<ImageId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired login name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Date of birth.
    pub birthdate: NaiveDate,
}

/// Column changes for a profile update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New login name.
    pub name: Option<String>,
    /// New date of birth.
    pub birthdate: Option<NaiveDate>,
    /// New profile image set.
    pub profile_picture_id: Option<ImageId>,
}

impl ProfileChanges {
    /// Build changes from raw form values, dropping blank names.
    pub fn new(
        name: Option<String>,
        birthdate: Option<NaiveDate>,
        profile_picture_id: Option<ImageId>,
    ) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            name,
            birthdate,
            profile_picture_id,
        }
    }

    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.birthdate.is_none() && self.profile_picture_id.is_none()
    }

    /// True when the update swaps the profile image reference.
    pub fn changes_image(&self) -> bool {
        self.profile_picture_id.is_some()
    }
}

/// Result of a committed profile update.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// The row as it stands after commit.
    pub user: User,
    /// Image id referenced before the update, captured inside the same
    /// transaction. Only read when the image reference changed.
    pub previous_image_id: Option<ImageId>,
}
