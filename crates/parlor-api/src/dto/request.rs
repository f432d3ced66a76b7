//! Request DTOs.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use parlor_storage::Crop;

/// Sign-up request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// `YYYY-MM-DD`.
    pub birthdate: NaiveDate,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Crop rectangle sent alongside a profile image, in percent of the image.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct CropRequest {
    #[validate(range(max = 100, message = "width must be between 0 and 100"))]
    pub width: u32,
    #[validate(range(max = 100, message = "height must be between 0 and 100"))]
    pub height: u32,
    #[validate(range(max = 100, message = "x must be between 0 and 100"))]
    pub x: u32,
    #[validate(range(max = 100, message = "y must be between 0 and 100"))]
    pub y: u32,
}

impl From<CropRequest> for Crop {
    fn from(c: CropRequest) -> Self {
        Crop {
            width: c.width,
            height: c.height,
            x: c.x,
            y: c.y,
        }
    }
}

/// Query of the profile image route.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageQuery {
    /// `jpeg`, `png` or `webp`. Defaults to `jpeg`.
    #[serde(rename = "type")]
    pub format: Option<String>,
}
