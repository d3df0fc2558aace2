//! Request-boundary encoding and configuration

use crate::common;
use gamevault::prelude::*;
use gamevault::{LevelReward, StatusCategory, WireError};

#[test]
fn replies_carry_status_and_reason_code() {
    let f = common::ephemeral();
    f.vault.players.add_xp("alice", 1000).unwrap();

    let (status, body) = to_reply(&f.vault.players.claim_level_reward("alice", 2));
    assert_eq!(status, 200);
    let reward: LevelReward = serde_json::from_str(&body).unwrap();
    assert_eq!(reward.coins, 500);

    let (status, body) = to_reply(&f.vault.players.claim_level_reward("alice", 2));
    assert_eq!(status, 409);
    let wire: WireError = serde_json::from_str(&body).unwrap();
    assert_eq!(wire.code, "ALREADY_CLAIMED");

    let (status, body) = to_reply(&f.vault.shop.buy("alice", "zz-999"));
    assert_eq!(status, 404);
    let wire: WireError = serde_json::from_str(&body).unwrap();
    assert_eq!(wire.code, "NOT_FOUND");

    f.fulfillment.fail_next();
    f.vault.players.add_xp("alice", 100_000).unwrap();
    let (status, body) = to_reply(&f.vault.players.claim_level_reward("alice", 5));
    assert_eq!(status, 502);
    let wire: WireError = serde_json::from_str(&body).unwrap();
    assert_eq!(wire.code, "EXTERNAL_FULFILLMENT_FAILURE");
}

#[test]
fn malformed_user_ids_are_rejected() {
    let f = common::ephemeral();
    let long = "x".repeat(300);
    for user in ["", "a/b", long.as_str()] {
        let err = f.vault.players.add_xp(user, 1).unwrap_err();
        assert_eq!(err.status(), StatusCategory::BadRequest);
    }
}

#[test]
fn vault_opens_from_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        r#"
path = "{}"
lock_timeout_ms = 250
sync_writes = false

[shop]
rotation_hours = 12
items_per_rotation = 3
seed = 9
"#,
        dir.path().display()
    );
    let config = VaultConfig::from_toml_str(&toml).unwrap();
    let vault = Vault::from_config(config).unwrap();

    assert!(!vault.is_ephemeral());
    assert_eq!(vault.config().lock_timeout_ms, 250);
    assert_eq!(vault.config().shop.items_per_rotation, 3);
}
