//! Profile updates that may swap the profile image.
//!
//! The image pipeline writes files before the database transaction opens,
//! so the two cannot commit atomically. Ordering keeps the row from ever
//! pointing at a missing set:
//!
//! 1. a new upload becomes an active set first;
//! 2. the row is updated in one transaction that also captures the
//!    previously referenced set under a row lock;
//! 3. only after commit is the previous set archived.
//!
//! If step 2 fails, the set from step 1 is archived again best-effort so it
//! does not linger as an unreferenced active set.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

use parlor_core::result::AppResult;
use parlor_core::types::ImageId;
use parlor_database::repositories::UserStore;
use parlor_entity::user::{ProfileChanges, User};
use parlor_storage::imaging::{Crop, Image};

use crate::context::RequestContext;
use crate::profile_image::ProfileImageManager;

/// Plain profile columns a user may change.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    /// New login name. Blank values are ignored.
    pub name: Option<String>,
    /// New date of birth.
    pub birthdate: Option<NaiveDate>,
}

/// An uploaded replacement profile image with its crop.
#[derive(Debug, Clone)]
pub struct NewProfileImage {
    /// The upload.
    pub image: Image,
    /// Requested crop in percent.
    pub crop: Crop,
}

/// Ties user row updates to the profile image lifecycle.
#[derive(Debug, Clone)]
pub struct ProfileCoordinator {
    users: Arc<dyn UserStore>,
    images: Arc<ProfileImageManager>,
}

impl ProfileCoordinator {
    /// Creates a new coordinator.
    pub fn new(users: Arc<dyn UserStore>, images: Arc<ProfileImageManager>) -> Self {
        Self { users, images }
    }

    /// Update the acting user's profile and return the committed row.
    ///
    /// A failure to archive the previous image after commit is returned as
    /// an error; the committed row stays as it is.
    #[instrument(skip(self, ctx, fields, new_image), fields(user_id = %ctx.user_id))]
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        fields: ProfileFields,
        new_image: Option<NewProfileImage>,
    ) -> AppResult<User> {
        let image_id = match new_image {
            Some(NewProfileImage { image, crop }) => Some(self.images.new_image(image, crop).await?),
            None => None,
        };

        let changes = ProfileChanges::new(fields.name, fields.birthdate, image_id);
        let update = match self.users.update_profile(ctx.user_id, &changes).await {
            Ok(update) => update,
            Err(e) => {
                if let Some(id) = image_id {
                    self.discard_unreferenced(id).await;
                }
                return Err(e);
            }
        };

        if let (Some(previous), Some(current)) = (update.previous_image_id, image_id) {
            self.archive_previous(ctx, previous, current).await?;
        }

        info!(image_changed = image_id.is_some(), "Profile updated");
        Ok(update.user)
    }

    async fn archive_previous(
        &self,
        ctx: &RequestContext,
        previous: ImageId,
        current: ImageId,
    ) -> AppResult<()> {
        // Another update may have committed since ours. Never archive the set
        // the row references now.
        let referenced = self
            .users
            .current_image_id(ctx.user_id)
            .await
            .inspect_err(|e| {
                error!(
                    image_id = %previous,
                    new_image_id = %current,
                    operation = "archive_previous",
                    error = %e,
                    "Profile committed but current image reference could not be read"
                );
            })?;
        if referenced == Some(previous) {
            warn!(
                image_id = %previous,
                "Previous image is referenced again, not archiving"
            );
            return Ok(());
        }

        self.images.archive(previous).await.inspect_err(|e| {
            error!(
                image_id = %previous,
                new_image_id = %current,
                operation = "archive_previous",
                error = %e,
                "Profile committed but previous image was not archived"
            );
        })
    }

    async fn discard_unreferenced(&self, id: ImageId) {
        match self.images.archive(id).await {
            Ok(()) => warn!(image_id = %id, "Archived image left unreferenced by failed update"),
            Err(e) => error!(
                image_id = %id,
                error = %e,
                "Failed to archive image left unreferenced by failed update"
            ),
        }
    }
}
