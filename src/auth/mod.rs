pub mod jwt;
pub mod middleware;

pub use jwt::{create_jwt, verify_jwt, Claims};
pub use middleware::{require_auth, AuthUser};
