use giftpair::{
    models::couple::CoupleStatus,
    repositories::{SqliteCoupleRepository, SqliteUserRepository},
    services::pairing_service::{PairingDecision, PairingError, PairingService},
    test_utils::test_helpers,
};
use sqlx::SqlitePool;
use std::sync::Arc;

async fn setup() -> (SqlitePool, PairingService) {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = PairingService::new(
        Arc::new(SqliteCoupleRepository::new(pool.clone())),
        Arc::new(SqliteUserRepository::new(pool.clone())),
    );
    (pool, service)
}

async fn user(pool: &SqlitePool, name: &str) -> i64 {
    test_helpers::insert_test_user(
        pool,
        name,
        &format!("{}@example.com", name),
        "password123",
        true,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_send_request_creates_pending_row() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let couple = service.send_request(ana, bia).await.unwrap();
    assert_eq!(couple.sender_id, ana);
    assert_eq!(couple.receiver_id, bia);
    assert_eq!(couple.status, CoupleStatus::Pending.as_i64());
}

#[tokio::test]
async fn test_duplicate_request_same_direction() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    service.send_request(ana, bia).await.unwrap();

    let result = service.send_request(ana, bia).await;
    assert!(matches!(result, Err(PairingError::DuplicatePairing)));
}

#[tokio::test]
async fn test_duplicate_request_reverse_direction() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    service.send_request(ana, bia).await.unwrap();

    let result = service.send_request(bia, ana).await;
    assert!(matches!(result, Err(PairingError::DuplicatePairing)));
}

#[tokio::test]
async fn test_send_request_to_self() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;

    let result = service.send_request(ana, ana).await;
    assert!(matches!(result, Err(PairingError::InvalidTarget)));
}

#[tokio::test]
async fn test_send_request_to_unknown_user() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;

    let result = service.send_request(ana, 9999).await;
    assert!(matches!(result, Err(PairingError::InvalidTarget)));
}

#[tokio::test]
async fn test_accept_makes_couple_visible_to_both_parties() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    assert!(service.find_active_couple(ana).await.unwrap().is_none());

    let couple = service.send_request(ana, bia).await.unwrap();
    let outcome = service
        .respond_to_request(bia, couple.id, PairingDecision::Accept)
        .await
        .unwrap();
    assert_eq!(outcome.couple.status, CoupleStatus::Active.as_i64());

    let for_ana = service.find_active_couple(ana).await.unwrap().unwrap();
    let for_bia = service.find_active_couple(bia).await.unwrap().unwrap();
    assert_eq!(for_ana.id, for_bia.id);
    assert_eq!(for_ana.status, CoupleStatus::Active.as_i64());

    // Counterpart projection points at the other party.
    assert_eq!(for_ana.counterpart(ana).id, bia);
    assert_eq!(for_bia.counterpart(bia).id, ana);
}

#[tokio::test]
async fn test_accept_conflicts_with_existing_active_pairing() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;
    let caio = user(&pool, "caio").await;

    let first = service.send_request(ana, bia).await.unwrap();
    service
        .respond_to_request(bia, first.id, PairingDecision::Accept)
        .await
        .unwrap();

    // Caio may still invite Ana, but the accept must fail because Ana is
    // already actively paired.
    let second = service.send_request(caio, ana).await.unwrap();
    let result = service
        .respond_to_request(ana, second.id, PairingDecision::Accept)
        .await;
    assert!(matches!(result, Err(PairingError::Conflict)));
}

#[tokio::test]
async fn test_respond_by_non_party_is_forbidden() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;
    let caio = user(&pool, "caio").await;

    let couple = service.send_request(ana, bia).await.unwrap();

    let result = service
        .respond_to_request(caio, couple.id, PairingDecision::Reject)
        .await;
    assert!(matches!(result, Err(PairingError::Forbidden)));
}

#[tokio::test]
async fn test_respond_to_unknown_couple_is_not_found() {
    let (_pool, service) = setup().await;

    let result = service
        .respond_to_request(1, 12345, PairingDecision::Accept)
        .await;
    assert!(matches!(result, Err(PairingError::NotFound)));
}

#[tokio::test]
async fn test_pending_requests_split_by_direction() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;
    let caio = user(&pool, "caio").await;
    let duda = user(&pool, "duda").await;

    // Ana sends one and receives two.
    service.send_request(ana, bia).await.unwrap();
    service.send_request(caio, ana).await.unwrap();
    service.send_request(duda, ana).await.unwrap();

    let pending = service.find_pending_couples(ana).await.unwrap();
    let sent = pending.request_sent.expect("Expected an outbound request");
    assert_eq!(sent.receiver.id, bia);
    assert_eq!(pending.request_received.len(), 2);

    let senders: Vec<i64> = pending.request_received.iter().map(|r| r.sender.id).collect();
    assert_eq!(senders, vec![caio, duda]);
}

#[tokio::test]
async fn test_rejected_rows_do_not_block_new_requests() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let first = service.send_request(ana, bia).await.unwrap();
    let outcome = service
        .respond_to_request(bia, first.id, PairingDecision::Reject)
        .await
        .unwrap();
    assert_eq!(outcome.couple.status, CoupleStatus::Rejected.as_i64());

    // Rejection is history, not a blocker.
    let second = service.send_request(ana, bia).await.unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.status, CoupleStatus::Pending.as_i64());
}

#[tokio::test]
async fn test_rejected_row_is_retained() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let couple = service.send_request(ana, bia).await.unwrap();
    service
        .respond_to_request(bia, couple.id, PairingDecision::Reject)
        .await
        .unwrap();

    let (status,): (i64,) = sqlx::query_as("SELECT status FROM couples WHERE id = ?")
        .bind(couple.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, CoupleStatus::Rejected.as_i64());

    let pending = service.find_pending_couples(ana).await.unwrap();
    assert!(pending.request_sent.is_none());
    assert!(pending.request_received.is_empty());
}

#[tokio::test]
async fn test_active_couple_cannot_be_rejected() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let couple = service.send_request(ana, bia).await.unwrap();
    service
        .respond_to_request(bia, couple.id, PairingDecision::Accept)
        .await
        .unwrap();

    // A later reject must not act as a break-up.
    let result = service
        .respond_to_request(bia, couple.id, PairingDecision::Reject)
        .await;
    assert!(matches!(result, Err(PairingError::AlreadyResolved)));

    let active = service.find_active_couple(ana).await.unwrap().unwrap();
    assert_eq!(active.id, couple.id);
}

#[tokio::test]
async fn test_rejected_couple_cannot_be_resurrected() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let couple = service.send_request(ana, bia).await.unwrap();
    service
        .respond_to_request(bia, couple.id, PairingDecision::Reject)
        .await
        .unwrap();

    // Accepting the dead row must not revive it.
    let result = service
        .respond_to_request(bia, couple.id, PairingDecision::Accept)
        .await;
    assert!(matches!(result, Err(PairingError::AlreadyResolved)));

    assert!(service.find_active_couple(ana).await.unwrap().is_none());

    let (status,): (i64,) = sqlx::query_as("SELECT status FROM couples WHERE id = ?")
        .bind(couple.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, CoupleStatus::Rejected.as_i64());
}

#[tokio::test]
async fn test_respond_always_attaches_sender_profile() {
    let (pool, service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    let couple = service.send_request(ana, bia).await.unwrap();

    // Bia responds; the attached profile is still Ana's (the sender's).
    let outcome = service
        .respond_to_request(bia, couple.id, PairingDecision::Accept)
        .await
        .unwrap();
    assert_eq!(outcome.partner.id, ana);
}

#[tokio::test]
async fn test_pair_invariant_enforced_by_storage_index() {
    let (pool, _service) = setup().await;
    let ana = user(&pool, "ana").await;
    let bia = user(&pool, "bia").await;

    test_helpers::insert_test_couple(&pool, ana, bia, CoupleStatus::Pending.as_i64())
        .await
        .unwrap();

    // Inserting the reverse edge directly must hit the partial unique
    // index on the normalized pair.
    let result = test_helpers::insert_test_couple(&pool, bia, ana, CoupleStatus::Pending.as_i64())
        .await;
    assert!(result.is_err());
}
