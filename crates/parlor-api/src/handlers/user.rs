//! The acting user's profile and password.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use bytes::BytesMut;
use chrono::NaiveDate;
use validator::Validate;

use parlor_core::error::{AppError, ErrorKind};
use parlor_service::{NewProfileImage, ProfileFields};
use parlor_storage::Image;

use crate::dto::{ApiResponse, ChangePasswordRequest, CropRequest, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PATCH /api/users/me
///
/// Multipart fields: `profileImage` (file), `crop` (JSON percentages,
/// required with a file), `name`, `birthdate` (`YYYY-MM-DD`).
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let max_bytes = state.config.profile_images.max_upload_bytes;

    let mut fields = ProfileFields::default();
    let mut image: Option<Image> = None;
    let mut crop: Option<CropRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "profileImage" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let buffer = read_limited(field, max_bytes).await?;
                if !buffer.is_empty() {
                    image = Some(Image::new(content_type, buffer.freeze()));
                }
            }
            "crop" => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed: CropRequest = serde_json::from_str(&text)
                    .map_err(|e| AppError::validation(format!("Invalid crop: {e}")))?;
                parsed
                    .validate()
                    .map_err(|e| AppError::validation(e.to_string()))?;
                crop = Some(parsed);
            }
            "name" => {
                fields.name = Some(field.text().await.map_err(multipart_error)?);
            }
            "birthdate" => {
                let text = field.text().await.map_err(multipart_error)?;
                let text = text.trim();
                if !text.is_empty() {
                    fields.birthdate =
                        Some(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
                            AppError::validation(format!("Invalid birthdate '{text}': {e}"))
                        })?);
                }
            }
            _ => {}
        }
    }

    let new_image = match (image, crop) {
        (Some(image), Some(crop)) => Some(NewProfileImage {
            image,
            crop: crop.into(),
        }),
        (Some(_), None) => {
            return Err(AppError::validation("crop is required with profileImage").into());
        }
        (None, _) => None,
    };

    let user = state
        .profiles
        .update_profile(&auth, fields, new_image)
        .await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Password changed"))))
}

/// Read a file field, failing with `ImageTooBig` as soon as it passes
/// `max_bytes`.
async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<BytesMut, AppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(too_big(max_bytes));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

fn too_big(max_bytes: usize) -> AppError {
    AppError::new(
        ErrorKind::ImageTooBig,
        format!("Profile image must not exceed {max_bytes} bytes"),
    )
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorKind::ImageTooBig, "Request body is too large")
    } else {
        AppError::with_source(ErrorKind::Validation, "Malformed multipart body", err)
    }
}
