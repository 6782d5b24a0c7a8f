use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::couple::{Couple, CoupleDecision, CoupleWithProfiles, PendingRequests};
use crate::models::user::PublicProfile;
use crate::services::pairing_service::PairingDecision;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub receiver_id: i64,
}

#[derive(Serialize)]
pub struct CoupleResponse {
    pub couple: Couple,
}

pub async fn send_couple_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SendRequestBody>,
) -> Result<(StatusCode, Json<CoupleResponse>)> {
    let couple = state
        .pairing_service
        .send_request(auth.user_id, body.receiver_id)
        .await?;

    Ok((StatusCode::CREATED, Json(CoupleResponse { couple })))
}

#[derive(Deserialize)]
pub struct RespondBody {
    pub status: i64,
}

pub async fn respond_couple_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<RespondBody>,
) -> Result<Json<CoupleDecision>> {
    let decision = PairingDecision::try_from(body.status).map_err(|other| {
        AppError::Validation(format!(
            "status must be 1 (accept) or 2 (reject), got {}",
            other
        ))
    })?;

    let outcome = state
        .pairing_service
        .respond_to_request(auth.user_id, id, decision)
        .await?;

    Ok(Json(outcome))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCoupleResponse {
    pub couple: Option<CoupleWithProfiles>,
}

pub async fn active_couple(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ActiveCoupleResponse>> {
    let couple = state.pairing_service.find_active_couple(auth.user_id).await?;

    Ok(Json(ActiveCoupleResponse { couple }))
}

pub async fn pending_couple_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<PendingRequests>> {
    let pending = state
        .pairing_service
        .find_pending_couples(auth.user_id)
        .await?;

    Ok(Json(pending))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: PublicProfile,
}

/// Partner lookup by short code; the `#` prefix is omitted on the wire.
pub async fn find_user_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let user = state
        .user_service
        .find_user_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        profile: user.profile(),
    }))
}
