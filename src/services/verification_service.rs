use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::{EmailError, EmailService};
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Token not found or expired")]
    TokenNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Email error: {0}")]
    EmailError(#[from] EmailError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

/// Email-verification token workflow. Accounts start inactive; redeeming
/// a token flips `is_active` exactly once and consumes the token.
pub struct VerificationService {
    pool: SqlitePool,
    email_service: Box<dyn EmailService>,
    user_repository: Arc<dyn UserRepository>,
}

impl VerificationService {
    pub fn new(
        pool: SqlitePool,
        email_service: Box<dyn EmailService>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            pool,
            email_service,
            user_repository,
        }
    }

    fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        hex::encode(bytes)
    }

    /// Issue a fresh token for the user and email the verification link.
    pub async fn send_verification(&self, user: &User) -> Result<String, VerificationError> {
        let token = Self::generate_token();
        let expires_at = (Utc::now() + Duration::hours(24)).to_rfc3339();

        sqlx::query(
            "INSERT INTO email_verification_tokens (user_id, token, expires_at) VALUES (?, ?, ?)",
        )
        .bind(user.id)
        .bind(&token)
        .bind(&expires_at)
        .execute(&self.pool)
        .await?;

        match self
            .email_service
            .send_verification_email(&user.email, &token)
            .await
        {
            Ok(()) => {
                tracing::info!("Verification email sent to: {}", user.email);
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Failed to send verification email to {}: {:?}", user.email, e);
                Err(e.into())
            }
        }
    }

    /// Redeem a token: activate the user and delete the token. Expired
    /// tokens are deleted and reported as not found.
    pub async fn verify_token(&self, token: &str) -> Result<User, VerificationError> {
        let row: Option<(i64, i64, String)> = sqlx::query_as(
            "SELECT id, user_id, expires_at FROM email_verification_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let (token_id, user_id, expires_at) = row.ok_or(VerificationError::TokenNotFound)?;

        let expires_at = chrono::DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|e| VerificationError::DatabaseError(sqlx::Error::Decode(Box::new(e))))?;

        if expires_at < Utc::now() {
            sqlx::query("DELETE FROM email_verification_tokens WHERE id = ?")
                .bind(token_id)
                .execute(&self.pool)
                .await?;
            return Err(VerificationError::TokenNotFound);
        }

        self.user_repository.activate(user_id).await?;

        sqlx::query("DELETE FROM email_verification_tokens WHERE id = ?")
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(VerificationError::UserNotFound)?;

        Ok(user)
    }

    pub async fn cleanup_expired_tokens(&self) -> Result<(), VerificationError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("DELETE FROM email_verification_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
