pub mod couple;
pub mod gift;
pub mod user;

pub use couple::{
    Couple, CoupleDecision, CoupleStatus, CoupleWithProfiles, PendingRequests, ReceivedRequest,
    SentRequest,
};
pub use gift::{Gift, GiftFilter};
pub use user::{PublicProfile, User};
