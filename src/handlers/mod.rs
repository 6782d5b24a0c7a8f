pub mod auth_handlers;
pub mod couple_handlers;
pub mod gift_handlers;

pub use auth_handlers::{login_handler, register_handler, verify_token_handler};
pub use couple_handlers::{
    active_couple, find_user_by_code, pending_couple_requests, respond_couple_request,
    send_couple_request,
};
pub use gift_handlers::{create_gift, list_gifts, upload_gift_image};
