use crate::models::gift::{Gift, GiftFilter};
use crate::repositories::gift_repository::{GiftRepository, NewGift};
use crate::repositories::user_repository::RepositoryError;
use std::sync::Arc;

pub const DEFAULT_CATEGORY: i64 = 9;
pub const MAX_ESTIMATED_PRICE: f64 = 100_000.0;

#[derive(Debug, thiserror::Error)]
pub enum GiftServiceError {
    #[error("Title must be between 3 and 100 characters")]
    InvalidTitle,
    #[error("Description must be between 3 and 500 characters")]
    InvalidDescription,
    #[error("Estimated price must be positive and at most 100000")]
    InvalidPrice,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateGiftRequest {
    pub title: String,
    pub description: String,
    pub estimated_price: f64,
    pub category: Option<i64>,
    pub priority: Option<bool>,
    pub added_by_user_id: i64,
    pub couple_id: Option<i64>,
    pub image_url: Option<String>,
}

pub struct GiftService {
    repository: Arc<dyn GiftRepository>,
}

impl GiftService {
    pub fn new(repository: Arc<dyn GiftRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_gift(&self, request: CreateGiftRequest) -> Result<Gift, GiftServiceError> {
        let title_len = request.title.chars().count();
        if !(3..=100).contains(&title_len) {
            return Err(GiftServiceError::InvalidTitle);
        }

        let description_len = request.description.chars().count();
        if !(3..=500).contains(&description_len) {
            return Err(GiftServiceError::InvalidDescription);
        }

        if request.estimated_price <= 0.0 || request.estimated_price > MAX_ESTIMATED_PRICE {
            return Err(GiftServiceError::InvalidPrice);
        }

        let gift = self
            .repository
            .create(NewGift {
                title: request.title,
                description: request.description,
                estimated_price: request.estimated_price,
                category: request.category.unwrap_or(DEFAULT_CATEGORY),
                priority: request.priority.unwrap_or(false),
                added_by_user_id: request.added_by_user_id,
                couple_id: request.couple_id,
                image_url: request.image_url,
            })
            .await?;

        Ok(gift)
    }

    pub async fn list_for_couple(
        &self,
        couple_id: i64,
        filter: GiftFilter,
    ) -> Result<Vec<Gift>, GiftServiceError> {
        Ok(self.repository.list_for_couple(couple_id, filter).await?)
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        filter: GiftFilter,
    ) -> Result<Vec<Gift>, GiftServiceError> {
        Ok(self.repository.list_for_user(user_id, filter).await?)
    }
}
