use crate::models::user::User;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Row not found")]
    NotFound,
    #[error("Unique constraint violated")]
    AlreadyExists,
    #[error("Pair already has a pending or active couple")]
    DuplicatePairing,
    #[error("A party already has an active couple")]
    ActiveConflict,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        full_name: &str,
        email: &str,
        code: &str,
        password_hash: &str,
    ) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<User>>;
    async fn activate(&self, id: i64) -> RepositoryResult<()>;
}

const USER_COLUMNS: &str = "id, full_name, email, code, password_hash, is_active, created_at";

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(
        &self,
        full_name: &str,
        email: &str,
        code: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (full_name, email, code, password_hash) VALUES (?, ?, ?, ?)",
        )
        .bind(full_name)
        .bind(email)
        .bind(code)
        .bind(password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_rowid();
                self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
            }
            Err(e) => {
                if e.to_string().contains("UNIQUE") {
                    Err(RepositoryError::AlreadyExists)
                } else {
                    Err(RepositoryError::Database(e))
                }
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE code = ?"))
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn activate(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = TRUE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
