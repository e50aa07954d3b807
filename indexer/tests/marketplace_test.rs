mod common;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::json;

use common::*;
use inscriptions_indexer::domain::models::CarrierTransaction;
use inscriptions_indexer::domain::protocols::fields::content_hash;
use inscriptions_indexer::domain::protocols::marketplace::escrow_address;
use inscriptions_indexer::domain::protocols::{DispatchStatus, ProtocolRegistry};
use inscriptions_indexer::infrastructure::persistence::entities::marketplace_listing;
use inscriptions_indexer::infrastructure::persistence::repositories::{
    inscription_repository, marketplace_repository,
};

fn market(hash: &str, height: u64, sender: &str, operation: &str, key_values: &str) -> CarrierBuilder {
    CarrierBuilder::new(hash, height, sender, &urn("marketplace", operation, key_values))
}

fn on_listing(hash: &str, height: u64, sender: &str, operation: &str, listing: &str) -> CarrierBuilder {
    market(hash, height, sender, operation, &format!("h={}", listing))
}

async fn listing(db: &DatabaseConnection, hash: &str) -> marketplace_listing::Model {
    marketplace_repository::find_by_hash(db, hash)
        .await
        .unwrap()
        .expect("listing exists")
}

async fn apply(registry: &ProtocolRegistry, carrier: CarrierBuilder) -> DispatchStatus {
    let carrier: CarrierTransaction = carrier.build();
    registry.process(&carrier).await.unwrap()
}

/// TOK with 500 units held by ALICE
async fn setup_market() -> (DatabaseConnection, ProtocolRegistry) {
    let db = setup_db().await;
    let registry = registry(&db);
    apply(
        &registry,
        CarrierBuilder::new(
            "DEPLOY1",
            10,
            ALICE,
            &urn("cft20", "deploy", "nam=Test,tic=TOK,sup=100000,dec=0,lim=1000"),
        ),
    )
    .await;
    apply(
        &registry,
        CarrierBuilder::new("MINT1", 11, ALICE, &urn("cft20", "mint", "tic=TOK,amt=500")),
    )
    .await;
    (db, registry)
}

#[tokio::test]
async fn test_cft20_listing_lifecycle() {
    let (db, registry) = setup_market().await;

    let status = apply(
        &registry,
        market("LIST1", 20, ALICE, "list.cft20", "tic=tok,amt=100,ppt=5,mindep=0.1,to=10"),
    )
    .await;
    assert_eq!(status, DispatchStatus::Applied);

    let listed = listing(&db, "LIST1").await;
    assert_eq!(listed.seller_address, ALICE);
    assert_eq!(listed.total, Decimal::from(500));
    assert_eq!(listed.deposit_total, Decimal::from(50));
    assert_eq!(listed.deposit_timeout, 10);
    assert!(!listed.is_deposited);
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(400));
    assert_eq!(balance(&db, "TOK", &escrow_address("LIST1")).await, Decimal::from(100));

    let status = apply(&registry, on_listing("BUY0", 21, BOB, "buy.cft20", "LIST1").pay(ALICE, 450)).await;
    assert_rejected(status, "no active deposit");

    let status = apply(&registry, on_listing("DEP0", 21, ALICE, "deposit", "LIST1").pay(ALICE, 50)).await;
    assert_rejected(status, "not authorized");

    let status = apply(&registry, on_listing("DEP1", 22, BOB, "deposit", "LIST1").pay(ALICE, 40)).await;
    assert_rejected(status, "insufficient payment");

    let status = apply(&registry, on_listing("DEP2", 22, BOB, "deposit", "list1").pay(ALICE, 50)).await;
    assert_eq!(status, DispatchStatus::Applied);
    let deposited = listing(&db, "LIST1").await;
    assert!(deposited.is_deposited);
    assert_eq!(deposited.depositor_address.as_deref(), Some(BOB));
    assert_eq!(deposited.depositor_timedout_block, Some(32));

    let status = apply(&registry, on_listing("DEP3", 23, CAROL, "deposit", "LIST1").pay(ALICE, 50)).await;
    assert_rejected(status, "active deposit");

    let status = apply(&registry, on_listing("DELIST0", 24, ALICE, "delist", "LIST1")).await;
    assert_rejected(status, "active deposit");

    let status = apply(&registry, on_listing("BUY1", 25, CAROL, "buy.cft20", "LIST1").pay(ALICE, 450)).await;
    assert_rejected(status, "no active deposit");

    let status = apply(&registry, on_listing("BUY2", 26, BOB, "buy.cft20", "LIST1").pay(ALICE, 449)).await;
    assert_rejected(status, "insufficient payment");

    let status = apply(&registry, on_listing("BUY3", 27, BOB, "buy.cft20", "LIST1").pay(ALICE, 450)).await;
    assert_eq!(status, DispatchStatus::Applied);

    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::from(100));
    assert_eq!(balance(&db, "TOK", &escrow_address("LIST1")).await, Decimal::ZERO);
    assert!(listing(&db, "LIST1").await.is_filled);
}

#[tokio::test]
async fn test_closed_listing_refuses_every_operation() {
    let (db, registry) = setup_market().await;

    apply(&registry, market("LIST1", 20, ALICE, "list.cft20", "tic=TOK,amt=10,ppt=1,mindep=0.5,to=10")).await;
    apply(&registry, on_listing("DEP1", 21, BOB, "deposit", "LIST1").pay(ALICE, 5)).await;
    let status = apply(&registry, on_listing("BUY1", 22, BOB, "buy", "LIST1").pay(ALICE, 5)).await;
    assert_eq!(status, DispatchStatus::Applied);

    let filled = listing(&db, "LIST1").await;

    let status = apply(&registry, on_listing("DELIST1", 40, ALICE, "delist", "LIST1")).await;
    assert_rejected(status, "already filled or cancelled");
    let status = apply(&registry, on_listing("DEP2", 41, CAROL, "deposit", "LIST1").pay(ALICE, 5)).await;
    assert_rejected(status, "already filled or cancelled");
    let status = apply(&registry, on_listing("BUY2", 42, BOB, "buy", "LIST1").pay(ALICE, 5)).await;
    assert_rejected(status, "already filled or cancelled");

    assert_eq!(listing(&db, "LIST1").await, filled);
    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::from(10));
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(490));
}

#[tokio::test]
async fn test_expired_deposit_can_be_replaced_and_delisted() {
    let (db, registry) = setup_market().await;

    apply(&registry, market("LIST2", 30, ALICE, "list.cft20", "tic=TOK,amt=50,ppt=2,mindep=0.5,to=5")).await;
    let listed = listing(&db, "LIST2").await;
    assert_eq!(listed.total, Decimal::from(100));
    assert_eq!(listed.deposit_total, Decimal::from(50));

    apply(&registry, on_listing("DEP1", 31, BOB, "deposit", "LIST2").pay(ALICE, 50)).await;

    let status = apply(&registry, on_listing("DEP2", 36, CAROL, "deposit", "LIST2").pay(ALICE, 50)).await;
    assert_rejected(status, "active deposit");

    let status = apply(&registry, on_listing("DEP3", 37, CAROL, "deposit", "LIST2").pay(ALICE, 50)).await;
    assert_eq!(status, DispatchStatus::Applied);
    assert_eq!(listing(&db, "LIST2").await.depositor_address.as_deref(), Some(CAROL));

    let status = apply(&registry, on_listing("BUY1", 38, BOB, "buy", "LIST2").pay(ALICE, 50)).await;
    assert_rejected(status, "no active deposit");

    let status = apply(&registry, on_listing("DELIST1", 39, BOB, "delist", "LIST2")).await;
    assert_rejected(status, "not authorized");

    let status = apply(&registry, on_listing("DELIST2", 40, ALICE, "delist", "LIST2")).await;
    assert_rejected(status, "active deposit");

    let status = apply(&registry, on_listing("DELIST3", 43, ALICE, "delist", "LIST2")).await;
    assert_eq!(status, DispatchStatus::Applied);

    assert!(listing(&db, "LIST2").await.is_cancelled);
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(500));
    assert_eq!(balance(&db, "TOK", &escrow_address("LIST2")).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_inscription_listing_transfers_ownership() {
    let (db, registry) = setup_market().await;

    let content = b"hello inscription";
    let hash = content_hash(content);
    let status = apply(
        &registry,
        CarrierBuilder::new("INSCRIBE1", 12, ALICE, &urn("inscription", "inscribe", &format!("h={}", hash)))
            .metadata(json!({ "name": "Hello" }))
            .content(content),
    )
    .await;
    assert_eq!(status, DispatchStatus::Applied);

    let status = apply(
        &registry,
        market("LISTI", 20, BOB, "list.inscription", &format!("h={},amt=1000,mindep=0.5,to=5", hash)),
    )
    .await;
    assert_rejected(status, "not the owner");

    let status = apply(
        &registry,
        market("LISTI", 21, ALICE, "list.inscription", &format!("h={},amt=1000,mindep=0.5,to=5", hash)),
    )
    .await;
    assert_eq!(status, DispatchStatus::Replayed);

    let status = apply(
        &registry,
        market("LISTI2", 21, ALICE, "list.inscription", &format!("h={},amt=1000,mindep=0.5,to=5", hash)),
    )
    .await;
    assert_eq!(status, DispatchStatus::Applied);

    let escrowed = inscription_repository::find_by_content_hash(&db, &hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(escrowed.current_owner, escrow_address("LISTI2"));

    apply(&registry, on_listing("DEP1", 22, BOB, "deposit", "LISTI2").pay(ALICE, 500)).await;

    let status = apply(&registry, on_listing("BUY1", 23, BOB, "buy.cft20", "LISTI2").pay(ALICE, 500)).await;
    assert_rejected(status, "does not sell");

    let status = apply(&registry, on_listing("BUY2", 24, BOB, "buy.inscription", "LISTI2").pay(ALICE, 500)).await;
    assert_eq!(status, DispatchStatus::Applied);

    let bought = inscription_repository::find_by_content_hash(&db, &hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bought.current_owner, BOB);
    assert!(listing(&db, "LISTI2").await.is_filled);
}

#[tokio::test]
async fn test_listing_terms_are_validated() {
    let (db, registry) = setup_market().await;

    let status = apply(&registry, market("LIST1", 20, ALICE, "list.cft20", "tic=TOK,amt=10,ppt=1,mindep=0.5,to=51")).await;
    assert_rejected(status, "'to'");

    let status = apply(&registry, market("LIST2", 21, ALICE, "list.cft20", "tic=TOK,amt=10,ppt=1,mindep=1.5,to=5")).await;
    assert_rejected(status, "mindep");

    let status = apply(&registry, market("LIST3", 22, ALICE, "list.cft20", "tic=TOK,amt=1000,ppt=1,mindep=0.5,to=5")).await;
    assert_rejected(status, "insufficient balance");

    let status = apply(&registry, on_listing("DEP1", 23, BOB, "deposit", "MISSING")).await;
    assert_rejected(status, "not found");

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(500));
    assert!(marketplace_repository::find_by_hash(&db, "LIST3").await.unwrap().is_none());
}
