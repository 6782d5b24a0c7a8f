use crate::models::user::PublicProfile;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of a couple row. Pending can move to active or rejected;
/// both of those are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoupleStatus {
    Pending,
    Active,
    Rejected,
}

impl CoupleStatus {
    pub fn as_i64(self) -> i64 {
        match self {
            CoupleStatus::Pending => 0,
            CoupleStatus::Active => 1,
            CoupleStatus::Rejected => 2,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Couple {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub status: i64,
    pub created_at: Option<String>,
}

impl Couple {
    pub fn involves(&self, user_id: i64) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

/// A couple row with both parties' public profiles attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleWithProfiles {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub status: i64,
    pub created_at: Option<String>,
    pub sender: PublicProfile,
    pub receiver: PublicProfile,
}

impl CoupleWithProfiles {
    /// The other party's profile from `user_id`'s point of view.
    pub fn counterpart(&self, user_id: i64) -> &PublicProfile {
        if self.sender_id == user_id {
            &self.receiver
        } else {
            &self.sender
        }
    }
}

/// Outcome of responding to a pairing request.
///
/// The attached profile is always the sender's, no matter which party
/// responded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleDecision {
    pub couple: Couple,
    pub partner: PublicProfile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentRequest {
    pub id: i64,
    pub status: i64,
    pub receiver: PublicProfile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRequest {
    pub id: i64,
    pub status: i64,
    pub sender: PublicProfile,
}

/// Pending invitations involving one user: at most one outbound, any
/// number of inbound.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequests {
    pub request_sent: Option<SentRequest>,
    pub request_received: Vec<ReceivedRequest>,
}
