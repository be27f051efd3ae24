use serde_json::json;

use crate::domain::entities::audit_block::{AuditBlock, GENESIS_HASH};
use crate::repositories::ledger::{AppendOutcome, InMemoryLedgerRepository, LedgerRepository};

#[tokio::test]
async fn test_genesis_append() {
    let repo = InMemoryLedgerRepository::new();
    assert!(repo.tail().await.unwrap().is_none());

    let block = AuditBlock::new(1, "UpdateStatus", "issue-1", json!({}), GENESIS_HASH, 1);
    assert_eq!(repo.append_if_tail(&block).await.unwrap(), AppendOutcome::Appended);
    assert_eq!(repo.tail().await.unwrap().unwrap().hash, block.hash);
}

#[tokio::test]
async fn test_append_with_stale_prev_hash_conflicts() {
    let repo = InMemoryLedgerRepository::new();
    let first = AuditBlock::new(1, "UpdateStatus", "issue-1", json!({}), GENESIS_HASH, 1);
    repo.append_if_tail(&first).await.unwrap();

    // Another genesis block would fork the chain
    let fork = AuditBlock::new(1, "UploadImages", "issue-2", json!({}), GENESIS_HASH, 2);
    assert_eq!(repo.append_if_tail(&fork).await.unwrap(), AppendOutcome::Conflict);

    let wrong_sequence = AuditBlock::new(3, "UploadImages", "issue-2", json!({}), first.hash.clone(), 2);
    assert_eq!(
        repo.append_if_tail(&wrong_sequence).await.unwrap(),
        AppendOutcome::Conflict
    );

    let second = AuditBlock::new(2, "UploadImages", "issue-2", json!({}), first.hash.clone(), 2);
    assert_eq!(repo.append_if_tail(&second).await.unwrap(), AppendOutcome::Appended);
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_by_subject() {
    let repo = InMemoryLedgerRepository::new();
    let first = AuditBlock::new(1, "UpdateStatus", "issue-1", json!({}), GENESIS_HASH, 1);
    let second = AuditBlock::new(2, "UpdateStatus", "issue-2", json!({}), first.hash.clone(), 2);
    let third = AuditBlock::new(3, "UploadImages", "issue-1", json!({}), second.hash.clone(), 3);
    for block in [&first, &second, &third] {
        repo.append_if_tail(block).await.unwrap();
    }

    let trail = repo.list_by_subject("issue-1").await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].sequence, 1);
    assert_eq!(trail[1].sequence, 3);
}
