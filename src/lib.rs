pub mod auth;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub auth_service: Arc<services::auth_service::AuthService>,
    pub verification_service: Arc<services::verification_service::VerificationService>,
    pub pairing_service: Arc<services::pairing_service::PairingService>,
    pub gift_service: Arc<services::gift_service::GiftService>,
    pub image_store: Arc<dyn services::image_service::ImageStore>,
    pub jwt_secret: Arc<Vec<u8>>,
    pub pool: sqlx::SqlitePool,
}
