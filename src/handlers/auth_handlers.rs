use crate::auth::create_jwt;
use crate::error::{AppError, Result};
use crate::models::couple::CoupleWithProfiles;
use crate::models::user::{PublicProfile, User};
use crate::models::couple::{ReceivedRequest, SentRequest};
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::RegisterUserRequest;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: i64,
    pub full_name: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            full_name: body.full_name,
            email: body.email,
            password: body.password,
        })
        .await?;

    state.verification_service.send_verification(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created. Check your email to verify the account.".to_string(),
            user: RegisteredUser {
                id: user.id,
                full_name: user.full_name,
                code: user.code,
            },
        }),
    ))
}

pub async fn verify_token_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<RegisterResponse>> {
    let user = state.verification_service.verify_token(&token).await?;

    Ok(Json(RegisterResponse {
        message: "Email verified. You can log in now.".to_string(),
        user: RegisteredUser {
            id: user.id,
            full_name: user.full_name,
            code: user.code,
        },
    }))
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// The caller's couple, collapsed to the other party's profile.
#[derive(Serialize)]
pub struct CoupleSummary {
    pub id: i64,
    pub status: i64,
    pub user: PublicProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
    pub full_name: String,
    pub code: String,
    pub couple: Option<CoupleSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoginUser,
    pub request_sent: Option<SentRequest>,
    pub request_received: Vec<ReceivedRequest>,
}

fn build_login_user(user: &User, active: Option<&CoupleWithProfiles>) -> LoginUser {
    let couple = active.map(|c| CoupleSummary {
        id: c.id,
        status: c.status,
        user: c.counterpart(user.id).clone(),
    });

    LoginUser {
        id: user.id,
        full_name: user.full_name.clone(),
        code: user.code.clone(),
        couple,
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .auth_service
        .authenticate(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;

    let active = state.pairing_service.find_active_couple(user.id).await?;

    // Pending lists only matter while the user is not yet paired.
    let (request_sent, request_received) = if active.is_none() {
        let pending = state.pairing_service.find_pending_couples(user.id).await?;
        (pending.request_sent, pending.request_received)
    } else {
        (None, Vec::new())
    };

    let token = create_jwt(user.id, &state.jwt_secret).map_err(|e| {
        tracing::error!("Failed to sign JWT: {}", e);
        AppError::InternalError
    })?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: build_login_user(&user, active.as_ref()),
        request_sent,
        request_received,
    }))
}
