use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub code: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: Option<String>,
}

impl User {
    pub fn profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            code: self.code.clone(),
        }
    }
}

/// The subset of user fields safe to expose to a pairing counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub full_name: String,
    pub code: String,
}
