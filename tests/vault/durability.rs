//! On-disk persistence and the recovery pass

use crate::common;
use chrono::Duration;
use gamevault_core::{keys, CardCollection};
use gamevault_durability::PendingBatch;
use gamevault_storage::codec;
use std::fs;
use std::path::Path;

fn journal_dir(root: &Path) -> std::path::PathBuf {
    root.join("journal")
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let f = common::durable(dir.path());
        f.vault.players.add_xp("alice", 1200).unwrap();
        f.vault.season.add_points("alice", 100).unwrap();
        f.vault.cards.add_card("alice", "fr-001").unwrap();
        f.vault.cards.add_card("bob", "op-002").unwrap();
        f.vault.trades.execute("alice", "fr-001", "bob", "op-002").unwrap();
        f.vault.flush().unwrap();
    }

    let f = common::durable(dir.path());
    assert!(!f.vault.is_ephemeral());
    assert_eq!(f.vault.path(), Some(dir.path()));
    assert!(!f.vault.recovery_report().unwrap().has_issues());

    let stats = f.vault.players.get("alice").unwrap();
    assert_eq!((stats.level, stats.xp), (2, 200));
    assert_eq!(f.vault.season.points("alice").unwrap(), 100);
    assert!(f.vault.cards.get("alice").unwrap().owns("op-002"));
    assert!(f.vault.cards.get("bob").unwrap().owns("fr-001"));
    assert_eq!(f.vault.metrics().backend, "file");
}

#[test]
fn shop_rotation_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let first = {
        let f = common::durable(dir.path());
        f.vault.shop.get_active_rotation().unwrap()
    };

    let f = common::durable(dir.path());
    f.clock.advance(Duration::hours(1));
    assert_eq!(f.vault.shop.get_active_rotation().unwrap(), first);
}

#[test]
fn committed_batch_is_rolled_forward_on_open() {
    let dir = tempfile::tempdir().unwrap();
    {
        let f = common::durable(dir.path());
        f.vault.cards.add_card("alice", "fr-001").unwrap();
        f.vault.cards.add_card("bob", "op-001").unwrap();
    }

    // A trade whose record reached the journal but whose documents did not.
    let at = common::start_time();
    let mut alice = CardCollection::default();
    alice.add_card("One Piece", "op-001", at);
    let mut bob = CardCollection::default();
    bob.add_card("Frieren", "fr-001", at);
    let batch = PendingBatch::new(vec![
        (keys::cards("alice"), codec::encode(&alice).unwrap()),
        (keys::cards("bob"), codec::encode(&bob).unwrap()),
    ]);
    fs::write(
        journal_dir(dir.path()).join(batch.file_name()),
        batch.encode().unwrap(),
    )
    .unwrap();

    let f = common::durable(dir.path());
    let report = f.vault.recovery_report().unwrap();
    assert_eq!(report.batches_rolled_forward, 1);
    assert_eq!(report.documents_restored, 2);

    let alice = f.vault.cards.get("alice").unwrap();
    let bob = f.vault.cards.get("bob").unwrap();
    assert!(alice.owns("op-001") && !alice.owns("fr-001"));
    assert!(bob.owns("fr-001") && !bob.owns("op-001"));
    assert_eq!(fs::read_dir(journal_dir(dir.path())).unwrap().count(), 0);
}

#[test]
fn torn_record_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    {
        let f = common::durable(dir.path());
        f.vault.cards.add_card("alice", "fr-001").unwrap();
    }

    let batch = PendingBatch::new(vec![(keys::cards("alice"), vec![1, 2, 3])]);
    let record = batch.encode().unwrap();
    fs::write(
        journal_dir(dir.path()).join(batch.file_name()),
        &record[..record.len() / 2],
    )
    .unwrap();

    let f = common::durable(dir.path());
    let report = f.vault.recovery_report().unwrap();
    assert_eq!(report.batches_discarded, 1);
    assert_eq!(report.batches_rolled_forward, 0);
    assert!(f.vault.cards.get("alice").unwrap().owns("fr-001"));
}

#[test]
fn corrupt_document_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    {
        let f = common::durable(dir.path());
        f.vault.players.add_xp("alice", 10).unwrap();
    }

    let docs: Vec<_> = fs::read_dir(dir.path().join("docs"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(docs.len(), 1);
    let mut bytes = fs::read(&docs[0]).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&docs[0], bytes).unwrap();

    let f = common::durable(dir.path());
    let err = f.vault.players.get("alice").unwrap_err();
    assert_eq!(err.reason_code(), "STORAGE_IO_ERROR");
    let err = f.vault.players.add_xp("alice", 1).unwrap_err();
    assert_eq!(err.reason_code(), "STORAGE_IO_ERROR");

    // Other documents are unaffected.
    f.vault.players.add_xp("bob", 1).unwrap();
}
