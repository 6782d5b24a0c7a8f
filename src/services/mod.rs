pub mod auth_service;
pub mod email_service;
pub mod gift_service;
pub mod image_service;
pub mod pairing_service;
pub mod user_service;
pub mod verification_service;

pub use auth_service::{AuthService, LoginRequest};
pub use email_service::{create_email_service, EmailService};
pub use gift_service::{CreateGiftRequest, GiftService};
pub use image_service::{create_image_store, ImageStore};
pub use pairing_service::{PairingDecision, PairingService};
pub use user_service::{RegisterUserRequest, UserService};
pub use verification_service::VerificationService;
