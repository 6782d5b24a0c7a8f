use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account not verified")]
    AccountNotVerified,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Check credentials and account state. Unknown email and wrong
    /// password produce the same error so the response does not reveal
    /// which one failed.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self.verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthServiceError::AccountNotVerified);
        }

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("ana@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));

        let request = LoginRequest {
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
        };

        let result = service.authenticate(request).await;
        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account() {
        use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"password123", &salt)
            .unwrap()
            .to_string();

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .with(eq("ana@example.com"))
            .times(1)
            .returning(move |email| {
                let user = User {
                    id: 1,
                    full_name: "Ana Silva".to_string(),
                    email: email.to_string(),
                    code: "#ABC123".to_string(),
                    password_hash: hash.clone(),
                    is_active: false,
                    created_at: None,
                };
                Box::pin(async move { Ok(Some(user)) })
            });

        let service = AuthService::new(Arc::new(mock_repo));

        let request = LoginRequest {
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
        };

        let result = service.authenticate(request).await;
        assert!(matches!(result, Err(AuthServiceError::AccountNotVerified)));
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));

        let result = service.get_user_by_id(1).await;
        assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
    }
}
