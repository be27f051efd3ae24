//! Integration tests for the MySQL stores.
//!
//! These need a reachable MySQL server (DATABASE_URL) and are ignored by default.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use pv_core::domain::entities::{AuditBlock, Challenge, GENESIS_HASH};
use pv_core::repositories::{
    AppendOutcome, ChallengeRepository, InsertOutcome, LedgerRepository,
};
use pv_shared::config::DatabaseConfig;

use super::connection_tests::test_database_url;
use crate::database::{DatabasePool, MySqlChallengeRepository, MySqlLedgerRepository};

async fn pool() -> DatabasePool {
    DatabasePool::new(DatabaseConfig::new(test_database_url()))
        .await
        .unwrap()
}

async fn challenge_repo() -> MySqlChallengeRepository {
    let pool = pool().await;
    let repo = MySqlChallengeRepository::new(pool.get_pool().clone(), StdDuration::from_secs(5));
    repo.ensure_schema().await.unwrap();
    repo
}

async fn ledger_repo() -> MySqlLedgerRepository {
    let pool = pool().await;
    let repo = MySqlLedgerRepository::new(pool.get_pool().clone());
    repo.ensure_schema().await.unwrap();
    repo
}

fn unique_subject() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn challenge_for(subject_index: &str) -> Challenge {
    Challenge::new(
        subject_index.to_string(),
        "nonce:ciphertext".to_string(),
        "9876543210".to_string(),
        "ab".repeat(32),
        "cd".repeat(16),
        Duration::minutes(10),
    )
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_insert_respects_cooldown() {
    let repo = challenge_repo().await;
    let subject = unique_subject();

    let first = challenge_for(&subject);
    assert_eq!(
        repo.insert_if_cooldown_elapsed(&first, Duration::seconds(30))
            .await
            .unwrap(),
        InsertOutcome::Inserted
    );

    let second = challenge_for(&subject);
    let outcome = repo
        .insert_if_cooldown_elapsed(&second, Duration::seconds(30))
        .await
        .unwrap();
    assert!(matches!(outcome, InsertOutcome::CooldownActive { wait_seconds } if wait_seconds > 0));

    repo.delete_all_for_subject(&subject).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_concurrent_inserts_admit_one() {
    let repo = Arc::new(challenge_repo().await);
    let subject = unique_subject();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        let challenge = challenge_for(&subject);
        handles.push(tokio::spawn(async move {
            repo.insert_if_cooldown_elapsed(&challenge, Duration::seconds(30))
                .await
                .unwrap()
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap() == InsertOutcome::Inserted {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);

    repo.delete_all_for_subject(&subject).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_compare_and_update_detects_stale_attempts() {
    let repo = challenge_repo().await;
    let subject = unique_subject();
    let mut challenge = challenge_for(&subject);
    repo.insert_if_cooldown_elapsed(&challenge, Duration::seconds(30))
        .await
        .unwrap();

    challenge.record_failed_attempt();
    assert!(repo.compare_and_update(&challenge, 0).await.unwrap());
    // Same expectation again is stale now
    assert!(!repo.compare_and_update(&challenge, 0).await.unwrap());

    challenge.mark_verified();
    assert!(repo.compare_and_update(&challenge, 1).await.unwrap());
    assert!(repo.has_verified(&subject).await.unwrap());
    assert!(repo.find_latest_unverified(&subject).await.unwrap().is_none());

    assert_eq!(repo.delete_all_for_subject(&subject).await.unwrap(), 1);
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_stored_challenge_roundtrips() {
    let repo = challenge_repo().await;
    let subject = unique_subject();
    let challenge = challenge_for(&subject);
    repo.insert_if_cooldown_elapsed(&challenge, Duration::seconds(30))
        .await
        .unwrap();

    let found = repo
        .find_latest_unverified_by_phone(&subject, "9876543210")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, challenge.id);
    assert_eq!(found.code_hash, challenge.code_hash);
    assert_eq!(
        found.expires_at.timestamp_millis(),
        challenge.expires_at.timestamp_millis()
    );

    assert!(repo.delete(challenge.id).await.unwrap());
    assert!(!repo.delete(challenge.id).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_ledger_rejects_fork() {
    let repo = ledger_repo().await;
    let tail = repo.tail().await.unwrap();
    let (sequence, prev_hash) = match &tail {
        Some(block) => (block.sequence + 1, block.hash.clone()),
        None => (1, GENESIS_HASH.to_string()),
    };
    let now = Utc::now().timestamp_millis();

    let winner = AuditBlock::new(
        sequence,
        "UpdateStatus",
        unique_subject(),
        json!({"status": "resolved"}),
        prev_hash.clone(),
        now,
    );
    let loser = AuditBlock::new(
        sequence,
        "UpdateStatus",
        unique_subject(),
        json!({"status": "rejected"}),
        prev_hash,
        now,
    );

    assert_eq!(
        repo.append_if_tail(&winner).await.unwrap(),
        AppendOutcome::Appended
    );
    assert_eq!(
        repo.append_if_tail(&loser).await.unwrap(),
        AppendOutcome::Conflict
    );

    let stored = repo.tail().await.unwrap().unwrap();
    assert_eq!(stored.hash, winner.hash);
    assert_eq!(stored.metadata, winner.metadata);

    let trail = repo.list_by_subject(&winner.subject).await.unwrap();
    assert_eq!(trail.len(), 1);
}
