use crate::repositories::user_repository::RepositoryError;
use crate::services::auth_service::AuthServiceError;
use crate::services::gift_service::GiftServiceError;
use crate::services::image_service::ImageStoreError;
use crate::services::pairing_service::PairingError;
use crate::services::user_service::UserServiceError;
use crate::services::verification_service::VerificationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-boundary error taxonomy. Service-layer errors convert into
/// these variants, and `IntoResponse` maps each to an HTTP status with a
/// JSON `{"message": ...}` body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Receiver does not exist or is the sender")]
    InvalidTarget,

    #[error("A pending or active couple already exists for this pair")]
    DuplicatePairing,

    #[error("{0}")]
    NotFound(String),

    #[error("You are not a party to this couple")]
    Forbidden,

    #[error("One of the parties already has an active couple")]
    Conflict,

    #[error("This couple request has already been resolved")]
    AlreadyResolved,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not verified")]
    AccountNotVerified,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidTarget | AppError::InvalidCredentials | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::DuplicatePairing
            | AppError::Conflict
            | AppError::AlreadyResolved
            | AppError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Forbidden | AppError::AccountNotVerified => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<PairingError> for AppError {
    fn from(err: PairingError) -> Self {
        match err {
            PairingError::InvalidTarget => AppError::InvalidTarget,
            PairingError::DuplicatePairing => AppError::DuplicatePairing,
            PairingError::NotFound => AppError::NotFound("Couple not found".to_string()),
            PairingError::Forbidden => AppError::Forbidden,
            PairingError::Conflict => AppError::Conflict,
            PairingError::AlreadyResolved => AppError::AlreadyResolved,
            PairingError::Repository(e) => e.into(),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail
            | UserServiceError::MissingFullName
            | UserServiceError::WeakPassword => AppError::Validation(err.to_string()),
            UserServiceError::EmailTaken => AppError::EmailTaken,
            UserServiceError::CodeExhausted | UserServiceError::HashingError(_) => {
                tracing::error!("User service error: {}", err);
                AppError::InternalError
            }
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::AccountNotVerified => AppError::AccountNotVerified,
            AuthServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            AuthServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::TokenNotFound => {
                AppError::NotFound("Verification token not found or expired".to_string())
            }
            VerificationError::UserNotFound => AppError::NotFound("User not found".to_string()),
            VerificationError::EmailError(e) => {
                tracing::error!("Email error: {}", e);
                AppError::InternalError
            }
            VerificationError::DatabaseError(e) => AppError::Database(e),
            VerificationError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<GiftServiceError> for AppError {
    fn from(err: GiftServiceError) -> Self {
        match err {
            GiftServiceError::InvalidTitle
            | GiftServiceError::InvalidDescription
            | GiftServiceError::InvalidPrice => AppError::Validation(err.to_string()),
            GiftServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ImageStoreError> for AppError {
    fn from(err: ImageStoreError) -> Self {
        tracing::error!("Image store error: {}", err);
        AppError::InternalError
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            RepositoryError::DuplicatePairing => AppError::DuplicatePairing,
            RepositoryError::ActiveConflict => AppError::Conflict,
            RepositoryError::AlreadyExists => {
                AppError::Validation("Unique constraint violated".to_string())
            }
        }
    }
}
