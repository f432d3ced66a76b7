//! Sign-up, login, logout and session status.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{
    ApiResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest, StatusResponse,
    UserResponse,
};
use crate::error::ApiError;
use crate::extractors::{Session, ValidatedJson};
use crate::state::AppState;

/// POST /api/users/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let user = state
        .user_service
        .sign_up(&req.name, &req.password, req.birthdate)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(user))),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = state.user_service.login(&req.name, &req.password).await?;
    session.log_in(user.id);
    Ok(Json(ApiResponse::ok(LoginResponse { id: user.id })))
}

/// POST /api/users/logout
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    session.destroy();
    Json(ApiResponse::ok(MessageResponse::new("Logged out")))
}

/// GET /api/users/status
pub async fn status(session: Session) -> Json<ApiResponse<StatusResponse>> {
    Json(ApiResponse::ok(StatusResponse {
        is_active: session.active_user().is_some(),
    }))
}
