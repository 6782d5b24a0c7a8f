use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use rand::Rng;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Full name is required")]
    MissingFullName,
    #[error("Password too weak (minimum 8 characters)")]
    WeakPassword,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Could not allocate a unique user code")]
    CodeExhausted,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegisterUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Create an inactive account. The user becomes active only after
    /// redeeming the email verification token.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, UserServiceError> {
        if request.full_name.trim().is_empty() {
            return Err(UserServiceError::MissingFullName);
        }
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        let password_hash = self.hash_password(&request.password)?;

        // Short codes collide rarely (36^6 space), but retry a few times
        // before giving up.
        for _ in 0..5 {
            let code = Self::generate_code();
            match self
                .repository
                .create_user(
                    request.full_name.trim(),
                    &request.email,
                    &code,
                    &password_hash,
                )
                .await
            {
                Ok(user) => return Ok(user),
                Err(RepositoryError::AlreadyExists) => {
                    // Could be the email or the code; only the code is worth
                    // retrying.
                    if self.repository.find_by_email(&request.email).await?.is_some() {
                        return Err(UserServiceError::EmailTaken);
                    }
                }
                Err(e) => return Err(UserServiceError::RepositoryError(e)),
            }
        }

        Err(UserServiceError::CodeExhausted)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Resolve a partner-lookup code. Accepts the code with or without its
    /// `#` prefix, since clients strip it from URLs.
    pub async fn find_user_by_code(&self, code: &str) -> Result<Option<User>, UserServiceError> {
        let normalized = if code.starts_with('#') {
            code.to_string()
        } else {
            format!("#{}", code)
        };
        Ok(self.repository.find_by_code(&normalized).await?)
    }

    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let charset: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let code: String = (0..6)
            .map(|_| {
                let idx = rng.gen_range(0..charset.len());
                charset[idx] as char
            })
            .collect();
        format!("#{}", code)
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if !email.contains('@') || email.len() > 255 || email.is_empty() {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < 8 {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}
