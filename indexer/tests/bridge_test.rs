mod common;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use common::*;
use inscriptions_indexer::domain::models::CarrierTransaction;
use inscriptions_indexer::domain::protocols::{bridge, DispatchStatus, ProtocolRegistry};
use inscriptions_indexer::domain::services::{EnableAttestation, SendAttestation};
use inscriptions_indexer::infrastructure::persistence::entities::bridge_history;
use inscriptions_indexer::infrastructure::persistence::repositories::{
    bridge_repository, transaction_repository,
};

fn bridge_op(hash: &str, height: u64, sender: &str, operation: &str, key_values: &str) -> CarrierTransaction {
    CarrierBuilder::new(hash, height, sender, &urn("bridge", operation, key_values)).build()
}

fn send(hash: &str, height: u64, amount: u64) -> CarrierTransaction {
    bridge_op(
        hash,
        height,
        ALICE,
        "send",
        &format!(
            "tic=TOK,amt={},rch={},rco={},dst=osmo1receiver",
            amount, REMOTE_CHAIN, REMOTE_CONTRACT
        ),
    )
}

fn recv(hash: &str, height: u64, sender: &str, amount: u64) -> CarrierTransaction {
    bridge_op(
        hash,
        height,
        sender,
        "recv",
        &format!(
            "tic=TOK,amt={},rch={},rco={},dst={}",
            amount, REMOTE_CHAIN, REMOTE_CONTRACT, BOB
        ),
    )
}

fn enable(hash: &str, height: u64, sender: &str) -> CarrierTransaction {
    bridge_op(hash, height, sender, "enable", &format!("tic=TOK,rch={}", REMOTE_CHAIN))
}

async fn history_of(db: &DatabaseConnection, hash: &str) -> Vec<bridge_history::Model> {
    let row = transaction_repository::find_by_hash(db, hash)
        .await
        .unwrap()
        .expect("recorded transaction");
    bridge_repository::find_history_by_transaction(db, row.id)
        .await
        .unwrap()
}

/// Seeded remote chain plus a TOK token with 1000 units held by ALICE
async fn setup_bridge() -> (DatabaseConnection, ProtocolRegistry) {
    let db = setup_db().await;
    let seeded = bridge::seed_remote_chains(&db, CHAIN_ID, &test_config().bridge)
        .await
        .unwrap();
    assert_eq!(seeded, 1);

    let registry = registry(&db);
    registry
        .process(
            &CarrierBuilder::new(
                "DEPLOY1",
                10,
                ALICE,
                &urn("cft20", "deploy", "nam=Test,tic=TOK,sup=1000000,dec=0,lim=1000000"),
            )
            .build(),
        )
        .await
        .unwrap();
    registry
        .process(
            &CarrierBuilder::new("MINT1", 11, ALICE, &urn("cft20", "mint", "tic=TOK,amt=1000"))
                .build(),
        )
        .await
        .unwrap();

    (db, registry)
}

#[tokio::test]
async fn test_send_requires_enabled_token() {
    let (db, registry) = setup_bridge().await;

    let status = registry.process(&send("SEND1", 12, 100)).await.unwrap();
    assert_rejected(status, "not enabled");
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(1000));
}

#[tokio::test]
async fn test_enable_is_admin_only_and_signed() {
    let (db, registry) = setup_bridge().await;

    let status = registry.process(&enable("ENABLE1", 12, ALICE)).await.unwrap();
    assert_rejected(status, "not authorized");

    let status = registry.process(&enable("ENABLE2", 13, ADMIN)).await.unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    let token = find_token(&db, "TOK").await;
    let enabled = bridge_repository::find_bridge_token(&db, REMOTE_CHAIN, token.id)
        .await
        .unwrap()
        .expect("bridge token row");
    assert!(enabled.enabled);

    let attestation = EnableAttestation {
        chain_id: CHAIN_ID.to_string(),
        ticker: "TOK".to_string(),
        decimals: 0,
        remote_chain_id: REMOTE_CHAIN.to_string(),
        remote_contract: REMOTE_CONTRACT.to_string(),
    };
    assert!(signer().verify(&attestation.message(), &enabled.signature));

    let history = history_of(&db, "ENABLE2").await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, bridge::ACTION_ENABLE);
    assert_eq!(history[0].signature.as_deref(), Some(enabled.signature.as_str()));
}

#[tokio::test]
async fn test_send_escrows_and_signs_after_commit() {
    let (db, registry) = setup_bridge().await;
    registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();

    let status = registry.process(&send("SEND1", 13, 400)).await.unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(600));
    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::from(400));
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(600));

    let history = history_of(&db, "SEND1").await;
    assert_eq!(history.len(), 1);
    let row = &history[0];
    assert_eq!(row.action, bridge::ACTION_SEND);
    assert_eq!(row.receiver, "osmo1receiver");
    assert_eq!(row.amount, Decimal::from(400));

    let attestation = SendAttestation {
        chain_id: CHAIN_ID.to_string(),
        tx_hash: "SEND1".to_string(),
        ticker: "TOK".to_string(),
        amount: Decimal::from(400),
        remote_chain_id: REMOTE_CHAIN.to_string(),
        remote_contract: REMOTE_CONTRACT.to_string(),
        receiver: "osmo1receiver".to_string(),
    };
    let signature = row.signature.as_deref().expect("signed send");
    assert!(signer().verify(&attestation.message(), signature));
}

#[tokio::test]
async fn test_replay_signs_send_interrupted_before_signing() {
    let (db, registry) = setup_bridge().await;
    registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();

    let carrier = send("SEND1", 13, 250);
    let dispatch = registry.apply(&carrier).await.unwrap();
    assert_eq!(dispatch.status, DispatchStatus::Applied);
    assert_eq!(dispatch.actions.len(), 1);
    drop(dispatch);

    let history = history_of(&db, "SEND1").await;
    assert!(history[0].signature.is_none());

    let status = registry.process(&carrier).await.unwrap();
    assert_eq!(status, DispatchStatus::Replayed);

    let history = history_of(&db, "SEND1").await;
    assert_eq!(history.len(), 1);
    assert!(history[0].signature.is_some());
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(750));
    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::from(250));

    let signature = history[0].signature.clone();
    assert_eq!(registry.process(&carrier).await.unwrap(), DispatchStatus::Replayed);
    assert_eq!(history_of(&db, "SEND1").await[0].signature, signature);
}

#[tokio::test]
async fn test_recv_releases_from_escrow() {
    let (db, registry) = setup_bridge().await;
    registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();
    registry.process(&send("SEND1", 13, 400)).await.unwrap();

    let status = registry.process(&recv("RECV1", 14, ALICE, 150)).await.unwrap();
    assert_rejected(status, "not authorized");

    let status = registry.process(&recv("RECV2", 15, ADMIN, 150)).await.unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::from(150));
    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::from(250));
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(750));

    let total = balance(&db, "TOK", ALICE).await
        + balance(&db, "TOK", BOB).await
        + balance(&db, "TOK", BRIDGE_ESCROW).await;
    assert_eq!(total, Decimal::from(1000));

    let history = history_of(&db, "RECV2").await;
    assert_eq!(history[0].action, bridge::ACTION_RECV);
    assert!(history[0].signature.is_none());
}

#[tokio::test]
async fn test_recv_may_overdraw_escrow() {
    let (db, registry) = setup_bridge().await;
    registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();
    registry.process(&send("SEND1", 13, 400)).await.unwrap();

    let status = registry.process(&recv("RECV1", 14, ADMIN, 1000)).await.unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::from(-600));
    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::from(1000));
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(1600));
}

#[tokio::test]
async fn test_escrow_account_cannot_take_plain_transfers() {
    let (db, registry) = setup_bridge().await;
    test_config().bridge.validate_escrow().unwrap();

    let transfer = CarrierBuilder::new(
        "XFER1",
        12,
        ALICE,
        &urn("cft20", "transfer", &format!("tic=TOK,amt=100,dst={}", BRIDGE_ESCROW)),
    )
    .build();
    let status = registry.process(&transfer).await.unwrap();
    assert_rejected(status, "dst");

    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::ZERO);
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(1000));
}

#[tokio::test]
async fn test_route_mismatches_are_rejected() {
    let (db, registry) = setup_bridge().await;
    registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();

    let wrong_contract = bridge_op(
        "SEND1",
        13,
        ALICE,
        "send",
        &format!("tic=TOK,amt=10,rch={},rco=osmo1other,dst=osmo1receiver", REMOTE_CHAIN),
    );
    assert_rejected(registry.process(&wrong_contract).await.unwrap(), "contract mismatch");

    let unknown_chain = bridge_op(
        "SEND2",
        14,
        ALICE,
        "send",
        "tic=TOK,amt=10,rch=juno-1,rco=juno1contract,dst=juno1receiver",
    );
    assert_rejected(registry.process(&unknown_chain).await.unwrap(), "not configured");

    let overdraft = send("SEND3", 15, 5000);
    assert_rejected(registry.process(&overdraft).await.unwrap(), "insufficient balance");

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(1000));
    assert_eq!(balance(&db, "TOK", BRIDGE_ESCROW).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_bridge_is_disabled_without_signing_key() {
    let db = setup_db().await;
    let registry = ProtocolRegistry::from_config(db.clone(), &test_config(), None);

    assert!(!registry.protocols().contains(&bridge::PROTOCOL));
    let status = registry.process(&enable("ENABLE1", 12, ADMIN)).await.unwrap();
    assert_eq!(status, DispatchStatus::Skipped);
}
