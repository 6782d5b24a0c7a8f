use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::gift::{Gift, GiftFilter};
use crate::services::gift_service::CreateGiftRequest;
use crate::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftBody {
    pub title: String,
    pub description: String,
    pub estimated_price: f64,
    pub category: Option<i64>,
    pub priority: Option<bool>,
    pub couple_id: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Serialize)]
pub struct GiftResponse {
    pub gift: Gift,
}

pub async fn create_gift(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateGiftBody>,
) -> Result<(StatusCode, Json<GiftResponse>)> {
    let gift = state
        .gift_service
        .create_gift(CreateGiftRequest {
            title: body.title,
            description: body.description,
            estimated_price: body.estimated_price,
            category: body.category,
            priority: body.priority,
            added_by_user_id: auth.user_id,
            couple_id: body.couple_id,
            image_url: body.image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(GiftResponse { gift })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGiftsQuery {
    pub couple_id: Option<i64>,
    pub category: Option<i64>,
    pub priority: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct GiftListResponse {
    pub gifts: Vec<Gift>,
}

/// List gifts for the caller's couple (explicit `coupleId`, or the active
/// one), falling back to gifts the caller added while unpaired.
pub async fn list_gifts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListGiftsQuery>,
) -> Result<Json<GiftListResponse>> {
    let filter = GiftFilter {
        category: query.category,
        priority: query.priority,
        limit: query.limit,
        offset: query.offset,
    };

    let couple_id = match query.couple_id {
        Some(id) => Some(id),
        None => state
            .pairing_service
            .find_active_couple(auth.user_id)
            .await?
            .map(|c| c.id),
    };

    let gifts = match couple_id {
        Some(id) => state.gift_service.list_for_couple(id, filter).await?,
        None => state.gift_service.list_for_user(auth.user_id, filter).await?,
    };

    Ok(Json(GiftListResponse { gifts }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

pub async fn upload_gift_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation(format!("Invalid multipart request: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("upload")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            AppError::Validation(format!("Failed to read file: {}", e))
        })?;

        if bytes.is_empty() {
            return Err(AppError::Validation("No file provided".to_string()));
        }

        let url = state.image_store.upload(bytes.to_vec(), &filename).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::Validation("No file provided".to_string()))
}
