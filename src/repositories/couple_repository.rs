use crate::models::couple::{Couple, CoupleStatus, CoupleWithProfiles};
use crate::models::user::PublicProfile;
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

/// Store accessor for the couple relation.
///
/// The invariant checks (one open row per unordered pair, one active row
/// per user) run inside the same transaction as the write, so concurrent
/// requests cannot interleave between check and write. The partial unique
/// index on the normalized pair backstops the pair invariant at the
/// storage layer.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CoupleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Couple>>;

    /// Insert a pending row for `sender_id` → `receiver_id`.
    /// Fails with `DuplicatePairing` when the unordered pair already has a
    /// pending or active row in either direction.
    async fn create_pending(&self, sender_id: i64, receiver_id: i64) -> RepositoryResult<Couple>;

    /// Transition a row to active. Fails with `ActiveConflict` when either
    /// party of the row already participates in another active couple.
    async fn accept(&self, id: i64) -> RepositoryResult<Couple>;

    /// Transition a row to rejected.
    async fn reject(&self, id: i64) -> RepositoryResult<Couple>;

    async fn find_active_for_user(&self, user_id: i64)
        -> RepositoryResult<Option<CoupleWithProfiles>>;

    async fn find_pending_for_user(&self, user_id: i64)
        -> RepositoryResult<Vec<CoupleWithProfiles>>;
}

const COUPLE_COLUMNS: &str = "id, sender_id, receiver_id, status, created_at";

/// Flat row for couple queries that join both parties' profiles.
#[derive(FromRow)]
struct CoupleProfilesRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    status: i64,
    created_at: Option<String>,
    sender_full_name: String,
    sender_code: String,
    receiver_full_name: String,
    receiver_code: String,
}

impl From<CoupleProfilesRow> for CoupleWithProfiles {
    fn from(row: CoupleProfilesRow) -> Self {
        CoupleWithProfiles {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            status: row.status,
            created_at: row.created_at,
            sender: PublicProfile {
                id: row.sender_id,
                full_name: row.sender_full_name,
                code: row.sender_code,
            },
            receiver: PublicProfile {
                id: row.receiver_id,
                full_name: row.receiver_full_name,
                code: row.receiver_code,
            },
        }
    }
}

const COUPLE_PROFILES_SELECT: &str = "
    SELECT c.id, c.sender_id, c.receiver_id, c.status, c.created_at,
           s.full_name AS sender_full_name, s.code AS sender_code,
           r.full_name AS receiver_full_name, r.code AS receiver_code
    FROM couples c
    JOIN users s ON s.id = c.sender_id
    JOIN users r ON r.id = c.receiver_id
";

pub struct SqliteCoupleRepository {
    pool: SqlitePool,
}

impl SqliteCoupleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoupleRepository for SqliteCoupleRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Couple>> {
        let couple = sqlx::query_as::<_, Couple>(&format!(
            "SELECT {COUPLE_COLUMNS} FROM couples WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(couple)
    }

    async fn create_pending(&self, sender_id: i64, receiver_id: i64) -> RepositoryResult<Couple> {
        let mut tx = self.pool.begin().await?;

        let open: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM couples
             WHERE status IN (?, ?)
               AND ((sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?))
             LIMIT 1",
        )
        .bind(CoupleStatus::Pending.as_i64())
        .bind(CoupleStatus::Active.as_i64())
        .bind(sender_id)
        .bind(receiver_id)
        .bind(receiver_id)
        .bind(sender_id)
        .fetch_optional(&mut *tx)
        .await?;

        if open.is_some() {
            return Err(RepositoryError::DuplicatePairing);
        }

        let result = sqlx::query(
            "INSERT INTO couples (sender_id, receiver_id, status) VALUES (?, ?, ?)",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(CoupleStatus::Pending.as_i64())
        .execute(&mut *tx)
        .await;

        let id = match result {
            Ok(res) => res.last_insert_rowid(),
            Err(e) => {
                // The partial unique index on the normalized pair also
                // reports duplicates raced past the check above.
                if e.to_string().contains("UNIQUE") {
                    return Err(RepositoryError::DuplicatePairing);
                }
                return Err(RepositoryError::Database(e));
            }
        };

        let couple = sqlx::query_as::<_, Couple>(&format!(
            "SELECT {COUPLE_COLUMNS} FROM couples WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(couple)
    }

    async fn accept(&self, id: i64) -> RepositoryResult<Couple> {
        let mut tx = self.pool.begin().await?;

        let couple = sqlx::query_as::<_, Couple>(&format!(
            "SELECT {COUPLE_COLUMNS} FROM couples WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        // Either party already actively paired (in any other row) blocks
        // the accept.
        let active: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM couples
             WHERE status = ?
               AND id <> ?
               AND (sender_id IN (?, ?) OR receiver_id IN (?, ?))
             LIMIT 1",
        )
        .bind(CoupleStatus::Active.as_i64())
        .bind(id)
        .bind(couple.sender_id)
        .bind(couple.receiver_id)
        .bind(couple.sender_id)
        .bind(couple.receiver_id)
        .fetch_optional(&mut *tx)
        .await?;

        if active.is_some() {
            return Err(RepositoryError::ActiveConflict);
        }

        sqlx::query("UPDATE couples SET status = ? WHERE id = ?")
            .bind(CoupleStatus::Active.as_i64())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let updated = sqlx::query_as::<_, Couple>(&format!(
            "SELECT {COUPLE_COLUMNS} FROM couples WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn reject(&self, id: i64) -> RepositoryResult<Couple> {
        let result = sqlx::query("UPDATE couples SET status = ? WHERE id = ?")
            .bind(CoupleStatus::Rejected.as_i64())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let couple = sqlx::query_as::<_, Couple>(&format!(
            "SELECT {COUPLE_COLUMNS} FROM couples WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(couple)
    }

    async fn find_active_for_user(
        &self,
        user_id: i64,
    ) -> RepositoryResult<Option<CoupleWithProfiles>> {
        let row = sqlx::query_as::<_, CoupleProfilesRow>(&format!(
            "{COUPLE_PROFILES_SELECT} WHERE c.status = ? AND (c.sender_id = ? OR c.receiver_id = ?)"
        ))
        .bind(CoupleStatus::Active.as_i64())
        .bind(user_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CoupleWithProfiles::from))
    }

    async fn find_pending_for_user(
        &self,
        user_id: i64,
    ) -> RepositoryResult<Vec<CoupleWithProfiles>> {
        let rows = sqlx::query_as::<_, CoupleProfilesRow>(&format!(
            "{COUPLE_PROFILES_SELECT} WHERE c.status = ? AND (c.sender_id = ? OR c.receiver_id = ?)
             ORDER BY c.id"
        ))
        .bind(CoupleStatus::Pending.as_i64())
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CoupleWithProfiles::from).collect())
    }
}
