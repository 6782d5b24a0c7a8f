use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_price: f64,
    pub category: i64,
    pub priority: bool,
    pub added_by_user_id: i64,
    pub couple_id: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

/// Optional filters for gift listings.
#[derive(Debug, Clone, Default)]
pub struct GiftFilter {
    pub category: Option<i64>,
    pub priority: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
