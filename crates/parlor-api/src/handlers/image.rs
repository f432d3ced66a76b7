//! Serving stored profile images.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use parlor_core::error::AppError;
use parlor_core::types::ImageId;
use parlor_storage::ImageFormat;

use crate::dto::ImageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /images/profile/{id}?type=jpeg|png|webp
pub async fn serve_profile_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let id: ImageId = id
        .parse()
        .map_err(|_| AppError::not_found("Image not found"))?;
    let format_name = query
        .format
        .as_deref()
        .unwrap_or(ImageFormat::Jpeg.name());

    let (format, file) = state.profile_images.serve(id, format_name).await?;

    Ok((
        [(header::CONTENT_TYPE, format.content_type())],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
