//! Unified application error types for Parlor.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] decides both the
//! machine-readable code sent to clients and the HTTP status.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input validation failed (malformed body, bad crop, missing field).
    Validation,
    /// The request needs a logged-in session.
    AuthRequired,
    /// Credentials did not match.
    LoginFail,
    /// The new password does not satisfy the password policy.
    PasswordNotValid,
    /// The supplied current password does not match the stored one.
    PasswordsMismatch,
    /// The requested resource was not found.
    NotFound,
    /// The declared image type is not one of jpeg, png, webp.
    UnsupportedFormat,
    /// The uploaded image exceeds the configured size limit.
    ImageTooBig,
    /// Image dimensions could not be determined.
    SizeProbeFailed,
    /// A codec crop/resize/compress step failed.
    ProcessingFailed,
    /// A codec format conversion failed.
    ConversionFailed,
    /// Writing an image file failed.
    WriteFailed,
    /// Moving an image set from active to archive failed.
    ArchiveFailed,
    /// A profile update carried no changed field.
    NoUpdatesToPerform,
    /// Another user already holds the requested name.
    UserNameAlreadyExists,
    /// The database failed for a reason the client cannot fix.
    DatabaseServerFail,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "validation_failed",
            Self::AuthRequired => "auth_required",
            Self::LoginFail => "login_fail",
            Self::PasswordNotValid => "password_not_valid",
            Self::PasswordsMismatch => "passwords_mismatch",
            Self::NotFound => "not_found",
            Self::UnsupportedFormat => "image_type_not_supported",
            Self::ImageTooBig => "profile_image_too_big",
            Self::SizeProbeFailed => "cannot_get_image_size",
            Self::ProcessingFailed => "image_processing_fail",
            Self::ConversionFailed => "image_conversion_fail",
            Self::WriteFailed => "image_write_fail",
            Self::ArchiveFailed => "image_archive_fail",
            Self::NoUpdatesToPerform => "no_updates_to_perform",
            Self::UserNameAlreadyExists => "user_name_already_exists",
            Self::DatabaseServerFail => "database_fail",
            Self::Configuration => "configuration",
            Self::Internal => "server_internal",
        }
    }

    /// HTTP status code this kind maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation
            | Self::PasswordNotValid
            | Self::PasswordsMismatch
            | Self::UnsupportedFormat
            | Self::ImageTooBig
            | Self::SizeProbeFailed
            | Self::NoUpdatesToPerform => 400,
            Self::AuthRequired | Self::LoginFail => 401,
            Self::NotFound => 404,
            Self::UserNameAlreadyExists => 409,
            Self::ProcessingFailed
            | Self::ConversionFailed
            | Self::WriteFailed
            | Self::ArchiveFailed
            | Self::DatabaseServerFail
            | Self::Configuration
            | Self::Internal => 500,
        }
    }

    /// Whether the caller caused the failure and may see its detail.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout Parlor.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a database failure.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DatabaseServerFail, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Validation, format!("Invalid JSON: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
