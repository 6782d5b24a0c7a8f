pub mod couple_repository;
pub mod gift_repository;
pub mod user_repository;

pub use couple_repository::{CoupleRepository, SqliteCoupleRepository};
pub use gift_repository::{GiftRepository, NewGift, SqliteGiftRepository};
pub use user_repository::{
    RepositoryError, RepositoryResult, SqliteUserRepository, UserRepository,
};
