//! Password policy enforcement for new passwords.

use parlor_core::config::AuthConfig;
use parlor_core::error::{AppError, ErrorKind};

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

fn not_valid(message: &str) -> AppError {
    AppError::new(ErrorKind::PasswordNotValid, message)
}

impl PasswordValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks length, character classes and zxcvbn strength, reporting the
    /// first violation as `PasswordNotValid`.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::new(
                ErrorKind::PasswordNotValid,
                format!(
                    "Password must be at least {} characters long",
                    self.min_length
                ),
            ));
        }

        if !password.chars().any(char::is_uppercase) {
            return Err(not_valid(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(char::is_lowercase) {
            return Err(not_valid(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(not_valid("Password must contain at least one digit"));
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(not_valid(
                "Password must contain at least one special character",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(not_valid(
                "Password is too weak, use a longer or less predictable one",
            ));
        }

        Ok(())
    }
}
