pub mod test_helpers {
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Insert a test user with hashed password; returns the user id
    pub async fn insert_test_user(
        pool: &SqlitePool,
        full_name: &str,
        email: &str,
        password: &str,
        active: bool,
    ) -> Result<i64, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        // Derive a unique-enough code from the email local part
        let local = email.split('@').next().unwrap_or("user");
        let code = format!("#{}", local.to_uppercase());

        let result = sqlx::query(
            "INSERT INTO users (full_name, email, code, password_hash, is_active) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(full_name)
        .bind(email)
        .bind(code)
        .bind(password_hash)
        .bind(active)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a couple row with the given status; returns the couple id
    pub async fn insert_test_couple(
        pool: &SqlitePool,
        sender_id: i64,
        receiver_id: i64,
        status: i64,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO couples (sender_id, receiver_id, status) VALUES (?, ?, ?)")
                .bind(sender_id)
                .bind(receiver_id)
                .bind(status)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }
}
