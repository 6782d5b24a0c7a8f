use giftpair::{db, repositories, router, services, AppState};

use repositories::{SqliteCoupleRepository, SqliteGiftRepository, SqliteUserRepository};
use services::{AuthService, GiftService, PairingService, UserService, VerificationService};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftpair=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let pool = db::create_pool().await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Initialize repositories
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let couple_repository = Arc::new(SqliteCoupleRepository::new(pool.clone()));
    let gift_repository = Arc::new(SqliteGiftRepository::new(pool.clone()));

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let auth_service = Arc::new(AuthService::new(user_repository.clone()));
    let pairing_service = Arc::new(PairingService::new(
        couple_repository.clone(),
        user_repository.clone(),
    ));
    let gift_service = Arc::new(GiftService::new(gift_repository));

    let email_service = services::create_email_service();
    let verification_service = Arc::new(VerificationService::new(
        pool.clone(),
        email_service,
        user_repository.clone(),
    ));

    let image_store: Arc<dyn services::ImageStore> = Arc::from(services::create_image_store());

    let jwt_secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?
        .into_bytes();

    // Create app state
    let app_state = AppState {
        user_service,
        auth_service,
        verification_service,
        pairing_service,
        gift_service,
        image_store,
        jwt_secret: Arc::new(jwt_secret),
        pool: pool.clone(),
    };

    let app = router::build_router(app_state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
