use chrono::{Duration, Utc};

use crate::domain::entities::challenge::Challenge;
use crate::errors::DomainError;
use crate::repositories::challenge::{ChallengeRepository, InMemoryChallengeRepository, InsertOutcome};

fn challenge(subject: &str, phone: &str, created_offset_secs: i64) -> Challenge {
    Challenge::new_at(
        subject.to_string(),
        "cipher".to_string(),
        phone.to_string(),
        "hash".to_string(),
        "salt".to_string(),
        Duration::minutes(10),
        Utc::now() + Duration::seconds(created_offset_secs),
    )
}

#[tokio::test]
async fn test_insert_respects_cooldown() {
    let repo = InMemoryChallengeRepository::new();
    let cooldown = Duration::seconds(30);

    let first = challenge("subject-a", "9876543210", 0);
    assert_eq!(
        repo.insert_if_cooldown_elapsed(&first, cooldown).await.unwrap(),
        InsertOutcome::Inserted
    );

    let second = challenge("subject-a", "9876543210", 10);
    match repo.insert_if_cooldown_elapsed(&second, cooldown).await.unwrap() {
        InsertOutcome::CooldownActive { wait_seconds } => assert_eq!(wait_seconds, 20),
        other => panic!("expected cooldown, got {:?}", other),
    }

    let third = challenge("subject-a", "9876543210", 31);
    assert_eq!(
        repo.insert_if_cooldown_elapsed(&third, cooldown).await.unwrap(),
        InsertOutcome::Inserted
    );
    assert_eq!(repo.len(), 2);
}

#[tokio::test]
async fn test_cooldown_is_per_subject() {
    let repo = InMemoryChallengeRepository::new();
    let cooldown = Duration::seconds(30);

    repo.insert_if_cooldown_elapsed(&challenge("subject-a", "9876543210", 0), cooldown)
        .await
        .unwrap();
    let outcome = repo
        .insert_if_cooldown_elapsed(&challenge("subject-b", "9876543210", 0), cooldown)
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::Inserted);
}

#[tokio::test]
async fn test_find_latest_unverified() {
    let repo = InMemoryChallengeRepository::new();
    let cooldown = Duration::zero();

    let older = challenge("subject-a", "9876543210", -60);
    let newer = challenge("subject-a", "9123456780", 0);
    repo.insert_if_cooldown_elapsed(&older, cooldown).await.unwrap();
    repo.insert_if_cooldown_elapsed(&newer, cooldown).await.unwrap();

    let found = repo.find_latest_unverified("subject-a").await.unwrap().unwrap();
    assert_eq!(found.id, newer.id);

    let by_phone = repo
        .find_latest_unverified_by_phone("subject-a", "9876543210")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_phone.id, older.id);

    assert!(repo.find_latest_unverified("subject-b").await.unwrap().is_none());
}

#[tokio::test]
async fn test_compare_and_update() {
    let repo = InMemoryChallengeRepository::new();
    let original = challenge("subject-a", "9876543210", 0);
    repo.insert_if_cooldown_elapsed(&original, Duration::zero()).await.unwrap();

    let mut first = original.clone();
    first.record_failed_attempt();
    assert!(repo.compare_and_update(&first, 0).await.unwrap());

    // A writer holding the stale copy loses
    let mut stale = original.clone();
    stale.record_failed_attempt();
    assert!(!repo.compare_and_update(&stale, 0).await.unwrap());

    let stored = repo.find_latest_unverified("subject-a").await.unwrap().unwrap();
    assert_eq!(stored.attempts, 1);
}

#[tokio::test]
async fn test_compare_and_update_rejects_verified_record() {
    let repo = InMemoryChallengeRepository::new();
    let original = challenge("subject-a", "9876543210", 0);
    repo.insert_if_cooldown_elapsed(&original, Duration::zero()).await.unwrap();

    let mut verified = original.clone();
    verified.mark_verified();
    assert!(repo.compare_and_update(&verified, 0).await.unwrap());
    assert!(repo.has_verified("subject-a").await.unwrap());

    let mut failed = original.clone();
    failed.record_failed_attempt();
    assert!(!repo.compare_and_update(&failed, 0).await.unwrap());
    assert!(repo.find_latest_unverified("subject-a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_operations() {
    let repo = InMemoryChallengeRepository::new();
    let a1 = challenge("subject-a", "9876543210", -60);
    let a2 = challenge("subject-a", "9876543210", 0);
    let b1 = challenge("subject-b", "9876543210", 0);
    for c in [&a1, &a2, &b1] {
        repo.insert_if_cooldown_elapsed(c, Duration::zero()).await.unwrap();
    }

    assert!(repo.delete(a1.id).await.unwrap());
    assert!(!repo.delete(a1.id).await.unwrap());
    assert_eq!(repo.delete_all_for_subject("subject-a").await.unwrap(), 1);
    assert_eq!(repo.delete_all_for_subject("subject-a").await.unwrap(), 0);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_should_fail() {
    let repo = InMemoryChallengeRepository::new();
    repo.set_should_fail(true);

    let result = repo.find_latest_unverified("subject-a").await;
    assert!(matches!(result, Err(DomainError::Storage { .. })));
}
