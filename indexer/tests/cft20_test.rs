mod common;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};

use common::*;
use inscriptions_indexer::domain::models::CarrierTransaction;
use inscriptions_indexer::domain::protocols::DispatchStatus;
use inscriptions_indexer::infrastructure::persistence::entities::{token, transaction};
use inscriptions_indexer::infrastructure::persistence::repositories::transaction_repository;

fn deploy(hash: &str, height: u64, sender: &str, key_values: &str) -> CarrierTransaction {
    CarrierBuilder::new(hash, height, sender, &urn("cft20", "deploy", key_values)).build()
}

fn op(hash: &str, height: u64, sender: &str, operation: &str, key_values: &str) -> CarrierTransaction {
    CarrierBuilder::new(hash, height, sender, &urn("cft20", operation, key_values)).build()
}

#[tokio::test]
async fn test_deploy_scales_supply_and_limit() {
    let db = setup_db().await;
    let registry = registry(&db);

    let status = registry
        .process(&deploy("DEPLOY1", 10, ALICE, "nam=Test Token,tic=tok,sup=21000000,dec=6,lim=1000"))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    let token = find_token(&db, "TOK").await;
    assert_eq!(token.name, "Test Token");
    assert_eq!(token.decimals, 6);
    assert_eq!(token.max_supply, Decimal::from(21_000_000_000_000i64));
    assert_eq!(token.per_wallet_limit, Decimal::from(1_000_000_000i64));
    assert_eq!(token.circulating_supply, Decimal::ZERO);
    assert_eq!(token.creator, ALICE);
    assert_eq!(token.launch_timestamp, block_time(10).and_utc().timestamp());

    let row = transaction_repository::find_by_hash(&db, "DEPLOY1")
        .await
        .unwrap()
        .expect("recorded transaction");
    assert_eq!(row.status_message, transaction_repository::STATUS_OK);
    assert_eq!(row.height, 10);
}

#[tokio::test]
async fn test_duplicate_ticker_is_rejected_and_recorded() {
    let db = setup_db().await;
    let registry = registry(&db);

    registry
        .process(&deploy("DEPLOY1", 10, ALICE, "nam=One,tic=TOK,sup=100,dec=0,lim=10"))
        .await
        .unwrap();
    let status = registry
        .process(&deploy("DEPLOY2", 11, BOB, "nam=Two,tic=tok,sup=500,dec=0,lim=50"))
        .await
        .unwrap();
    assert_rejected(status, "already exists");

    assert_eq!(token::Entity::find().count(&db).await.unwrap(), 1);
    let row = transaction_repository::find_by_hash(&db, "DEPLOY2")
        .await
        .unwrap()
        .expect("rejected transaction is recorded");
    assert!(row.status_message.contains("TOK"));
}

#[tokio::test]
async fn test_invalid_deploy_fields() {
    let db = setup_db().await;
    let registry = registry(&db);

    let status = registry
        .process(&deploy("BAD1", 10, ALICE, "nam=Bad,tic=TOK,sup=100,dec=19,lim=10"))
        .await
        .unwrap();
    assert_rejected(status, "dec");

    let status = registry
        .process(&deploy("BAD2", 11, ALICE, "nam=Bad,tic=TO-K,sup=100,dec=0,lim=10"))
        .await
        .unwrap();
    assert_rejected(status, "tic");

    let status = registry
        .process(&deploy("BAD3", 12, ALICE, "nam=Bad,tic=TOK,dec=0,lim=10"))
        .await
        .unwrap();
    assert_rejected(status, "sup");

    assert_eq!(token::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_mint_transfer_burn_conserve_supply() {
    let db = setup_db().await;
    let registry = registry(&db);

    registry
        .process(&deploy("DEPLOY1", 10, ALICE, "nam=Test,tic=TOK,sup=1000,dec=0,lim=500"))
        .await
        .unwrap();

    let status = registry
        .process(&op("MINT1", 11, ALICE, "mint", "tic=tok,amt=300"))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    let status = registry
        .process(&op("MINT2", 12, ALICE, "mint", "tic=TOK,amt=300"))
        .await
        .unwrap();
    assert_rejected(status, "mint limit");

    let status = registry
        .process(&op("XFER1", 13, ALICE, "transfer", &format!("tic=TOK,amt=100,dst={}", BOB)))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    let status = registry
        .process(&op("BURN1", 14, BOB, "burn", "tic=TOK,amt=50"))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(200));
    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::from(50));
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(250));

    for address in [ALICE, BOB] {
        assert_eq!(
            history_sum(&db, "TOK", address).await,
            balance(&db, "TOK", address).await
        );
    }
}

#[tokio::test]
async fn test_overdrafts_leave_no_effects() {
    let db = setup_db().await;
    let registry = registry(&db);

    registry
        .process(&deploy("DEPLOY1", 10, ALICE, "nam=Test,tic=TOK,sup=1000,dec=2,lim=1000"))
        .await
        .unwrap();
    registry
        .process(&op("MINT1", 11, ALICE, "mint", "tic=TOK,amt=10.5"))
        .await
        .unwrap();
    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(1050));

    let status = registry
        .process(&op("XFER1", 12, ALICE, "transfer", &format!("tic=TOK,amt=11,dst={}", BOB)))
        .await
        .unwrap();
    assert_rejected(status, "insufficient balance");

    let status = registry
        .process(&op("BURN1", 13, BOB, "burn", "tic=TOK,amt=1"))
        .await
        .unwrap();
    assert_rejected(status, "insufficient balance");

    let status = registry
        .process(&op("MINT2", 14, ALICE, "mint", "tic=TOK,amt=0.001"))
        .await
        .unwrap();
    assert_rejected(status, "amt");

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(1050));
    assert_eq!(balance(&db, "TOK", BOB).await, Decimal::ZERO);
    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(1050));
}

#[tokio::test]
async fn test_mint_respects_launch_time_and_max_supply() {
    let db = setup_db().await;
    let registry = registry(&db);

    let opening = block_time(20).and_utc().timestamp();
    registry
        .process(&deploy(
            "DEPLOY1",
            10,
            ALICE,
            &format!("nam=Test,tic=TOK,sup=100,dec=0,lim=100,opn={}", opening),
        ))
        .await
        .unwrap();

    let status = registry
        .process(&op("MINT1", 11, ALICE, "mint", "tic=TOK,amt=10"))
        .await
        .unwrap();
    assert_rejected(status, "not open");

    let status = registry
        .process(&op("MINT2", 20, ALICE, "mint", "tic=TOK,amt=100"))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);

    let status = registry
        .process(&op("MINT3", 21, BOB, "mint", "tic=TOK,amt=1"))
        .await
        .unwrap();
    assert_rejected(status, "max supply");

    assert_eq!(find_token(&db, "TOK").await.circulating_supply, Decimal::from(100));
}

#[tokio::test]
async fn test_mint_near_decimal_range_is_rejected_not_overflowed() {
    let db = setup_db().await;
    let registry = registry(&db);

    let huge = "50000000000000000000000000000";
    registry
        .process(&deploy(
            "DEPLOY1",
            10,
            ALICE,
            &format!("nam=Big,tic=BIG,sup={},dec=0,lim={}", huge, huge),
        ))
        .await
        .unwrap();

    let status = registry
        .process(&op("MINT1", 11, ALICE, "mint", "tic=BIG,amt=40000000000000000000000000000"))
        .await
        .unwrap();
    assert_eq!(status, DispatchStatus::Applied);
    let supply_after_first = find_token(&db, "BIG").await.circulating_supply;

    let status = registry
        .process(&op("MINT2", 12, BOB, "mint", "tic=BIG,amt=40000000000000000000000000000"))
        .await
        .unwrap();
    assert_rejected(status, "max supply");

    assert_eq!(find_token(&db, "BIG").await.circulating_supply, supply_after_first);
    assert_eq!(balance(&db, "BIG", BOB).await, Decimal::ZERO);
    let row = transaction_repository::find_by_hash(&db, "MINT2")
        .await
        .unwrap()
        .expect("rejected mint is recorded");
    assert!(row.status_message.contains("max supply"));
}

#[tokio::test]
async fn test_replayed_transaction_has_no_second_effect() {
    let db = setup_db().await;
    let registry = registry(&db);

    registry
        .process(&deploy("DEPLOY1", 10, ALICE, "nam=Test,tic=TOK,sup=1000,dec=0,lim=500"))
        .await
        .unwrap();

    let mint = op("MINT1", 11, ALICE, "mint", "tic=TOK,amt=100");
    assert_eq!(registry.process(&mint).await.unwrap(), DispatchStatus::Applied);
    assert_eq!(registry.process(&mint).await.unwrap(), DispatchStatus::Replayed);

    assert_eq!(balance(&db, "TOK", ALICE).await, Decimal::from(100));
    assert_eq!(transaction::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_foreign_chain_and_malformed_strings_are_rejected() {
    let db = setup_db().await;
    let registry = registry(&db);

    let foreign = CarrierBuilder::new(
        "FOREIGN1",
        10,
        ALICE,
        "urn:cft20:osmosis-1@v1;deploy$nam=Test,tic=TOK,sup=100,dec=0,lim=10",
    )
    .build();
    assert_rejected(registry.process(&foreign).await.unwrap(), "chain id mismatch");

    let malformed = CarrierBuilder::new("MALFORMED1", 11, ALICE, "urn:cft20:cosmoshub-4@v1;deploy").build();
    assert_rejected(registry.process(&malformed).await.unwrap(), "malformed");
    assert_eq!(registry.process(&malformed).await.unwrap(), DispatchStatus::Replayed);

    let unknown_op = op("UNKNOWN1", 12, ALICE, "airdrop", "tic=TOK");
    assert_rejected(registry.process(&unknown_op).await.unwrap(), "unknown operation");

    assert_eq!(token::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(transaction::Entity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_unknown_protocol_is_skipped_without_record() {
    let db = setup_db().await;
    let registry = registry(&db);

    let carrier = CarrierBuilder::new("OTHER1", 10, ALICE, &urn("brc99", "deploy", "tic=TOK")).build();
    assert_eq!(registry.process(&carrier).await.unwrap(), DispatchStatus::Skipped);
    assert_eq!(transaction::Entity::find().count(&db).await.unwrap(), 0);
}
