use crate::models::gift::{Gift, GiftFilter};
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct NewGift {
    pub title: String,
    pub description: String,
    pub estimated_price: f64,
    pub category: i64,
    pub priority: bool,
    pub added_by_user_id: i64,
    pub couple_id: Option<i64>,
    pub image_url: Option<String>,
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait GiftRepository: Send + Sync {
    async fn create(&self, gift: NewGift) -> RepositoryResult<Gift>;
    async fn list_for_couple(&self, couple_id: i64, filter: GiftFilter)
        -> RepositoryResult<Vec<Gift>>;
    async fn list_for_user(&self, user_id: i64, filter: GiftFilter)
        -> RepositoryResult<Vec<Gift>>;
}

const GIFT_COLUMNS: &str = "id, title, description, estimated_price, category, priority, \
                            added_by_user_id, couple_id, image_url, created_at";

pub struct SqliteGiftRepository {
    pool: SqlitePool,
}

impl SqliteGiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list(
        &self,
        scope_column: &str,
        scope_id: i64,
        filter: GiftFilter,
    ) -> RepositoryResult<Vec<Gift>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {GIFT_COLUMNS} FROM gifts WHERE {scope_column} = "
        ));
        query.push_bind(scope_id);

        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority);
        }

        query.push(" ORDER BY id");
        query.push(" LIMIT ").push_bind(filter.limit.unwrap_or(100));
        query.push(" OFFSET ").push_bind(filter.offset.unwrap_or(0));

        let gifts = query
            .build_query_as::<Gift>()
            .fetch_all(&self.pool)
            .await?;

        Ok(gifts)
    }
}

#[async_trait]
impl GiftRepository for SqliteGiftRepository {
    async fn create(&self, gift: NewGift) -> RepositoryResult<Gift> {
        let result = sqlx::query(
            "INSERT INTO gifts
                 (title, description, estimated_price, category, priority,
                  added_by_user_id, couple_id, image_url)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&gift.title)
        .bind(&gift.description)
        .bind(gift.estimated_price)
        .bind(gift.category)
        .bind(gift.priority)
        .bind(gift.added_by_user_id)
        .bind(gift.couple_id)
        .bind(&gift.image_url)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let created =
            sqlx::query_as::<_, Gift>(&format!("SELECT {GIFT_COLUMNS} FROM gifts WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        Ok(created)
    }

    async fn list_for_couple(
        &self,
        couple_id: i64,
        filter: GiftFilter,
    ) -> RepositoryResult<Vec<Gift>> {
        self.list("couple_id", couple_id, filter).await
    }

    async fn list_for_user(&self, user_id: i64, filter: GiftFilter) -> RepositoryResult<Vec<Gift>> {
        self.list("added_by_user_id", user_id, filter).await
    }
}
