use crate::models::couple::{
    Couple, CoupleDecision, CoupleStatus, CoupleWithProfiles, PendingRequests, ReceivedRequest,
    SentRequest,
};
use crate::repositories::couple_repository::CoupleRepository;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    #[error("Receiver does not exist or is the sender")]
    InvalidTarget,
    #[error("A pending or active couple already exists for this pair")]
    DuplicatePairing,
    #[error("Couple not found")]
    NotFound,
    #[error("Responder is not a party to this couple")]
    Forbidden,
    #[error("A party already has an active couple")]
    Conflict,
    #[error("This couple request has already been resolved")]
    AlreadyResolved,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Answer to a pending invitation, wire-encoded as 1 (accept) or 2 (reject).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingDecision {
    Accept,
    Reject,
}

impl TryFrom<i64> for PairingDecision {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PairingDecision::Accept),
            2 => Ok(PairingDecision::Reject),
            other => Err(other),
        }
    }
}

/// The invite/accept/reject workflow between two user accounts.
///
/// A couple row starts pending and ends active or rejected; active couples
/// are exclusive per user. The repository runs each check-then-write step
/// in one transaction, so the service only sequences the workflow and maps
/// errors.
pub struct PairingService {
    couple_repository: Arc<dyn CoupleRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl PairingService {
    pub fn new(
        couple_repository: Arc<dyn CoupleRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            couple_repository,
            user_repository,
        }
    }

    /// Create a pending invitation from `sender_id` to `receiver_id`.
    pub async fn send_request(
        &self,
        sender_id: i64,
        receiver_id: i64,
    ) -> Result<Couple, PairingError> {
        if sender_id == receiver_id {
            return Err(PairingError::InvalidTarget);
        }

        self.user_repository
            .find_by_id(receiver_id)
            .await?
            .ok_or(PairingError::InvalidTarget)?;

        match self
            .couple_repository
            .create_pending(sender_id, receiver_id)
            .await
        {
            Ok(couple) => Ok(couple),
            Err(RepositoryError::DuplicatePairing) => Err(PairingError::DuplicatePairing),
            Err(e) => Err(PairingError::Repository(e)),
        }
    }

    /// Accept or reject a pending invitation.
    ///
    /// The returned profile is the sender's regardless of which party
    /// responded; clients depend on this shape.
    pub async fn respond_to_request(
        &self,
        responder_id: i64,
        couple_id: i64,
        decision: PairingDecision,
    ) -> Result<CoupleDecision, PairingError> {
        let couple = self
            .couple_repository
            .find_by_id(couple_id)
            .await?
            .ok_or(PairingError::NotFound)?;

        if !couple.involves(responder_id) {
            return Err(PairingError::Forbidden);
        }

        // Active and rejected are terminal: an active couple cannot be
        // broken up through this endpoint, and a rejected request cannot
        // be resurrected.
        if couple.status != CoupleStatus::Pending.as_i64() {
            return Err(PairingError::AlreadyResolved);
        }

        let updated = match decision {
            PairingDecision::Accept => match self.couple_repository.accept(couple_id).await {
                Ok(couple) => couple,
                Err(RepositoryError::ActiveConflict) => return Err(PairingError::Conflict),
                Err(RepositoryError::NotFound) => return Err(PairingError::NotFound),
                Err(e) => return Err(PairingError::Repository(e)),
            },
            PairingDecision::Reject => match self.couple_repository.reject(couple_id).await {
                Ok(couple) => couple,
                Err(RepositoryError::NotFound) => return Err(PairingError::NotFound),
                Err(e) => return Err(PairingError::Repository(e)),
            },
        };

        let partner = self
            .user_repository
            .find_by_id(couple.sender_id)
            .await?
            .ok_or(PairingError::NotFound)?
            .profile();

        Ok(CoupleDecision {
            couple: updated,
            partner,
        })
    }

    /// The user's single active couple, if any, with both profiles.
    pub async fn find_active_couple(
        &self,
        user_id: i64,
    ) -> Result<Option<CoupleWithProfiles>, PairingError> {
        Ok(self.couple_repository.find_active_for_user(user_id).await?)
    }

    /// Pending invitations involving the user, split into the outbound one
    /// and every inbound one.
    pub async fn find_pending_couples(&self, user_id: i64) -> Result<PendingRequests, PairingError> {
        let pending = self.couple_repository.find_pending_for_user(user_id).await?;

        let request_sent = pending
            .iter()
            .find(|c| c.sender_id == user_id)
            .map(|c| SentRequest {
                id: c.id,
                status: c.status,
                receiver: c.receiver.clone(),
            });

        let request_received = pending
            .iter()
            .filter(|c| c.receiver_id == user_id)
            .map(|c| ReceivedRequest {
                id: c.id,
                status: c.status,
                sender: c.sender.clone(),
            })
            .collect();

        Ok(PendingRequests {
            request_sent,
            request_received,
        })
    }
}
