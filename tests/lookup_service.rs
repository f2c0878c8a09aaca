use std::collections::HashSet;
use std::str::FromStr;

use bitcoin::{PublicKey, Txid};
use bitcoin::script::ScriptBuf;
use tempfile::TempDir;

use pushdrop_lookup::Error;
use pushdrop_lookup::lookup::types::LookupQuery;
use pushdrop_lookup::lookup::{Config as LookupConfig, TokenLookupService};
use pushdrop_lookup::script::protocol::TokenProtocol;
use pushdrop_lookup::script::pushdrop;
use pushdrop_lookup::storage::kv_store::StorageHandler;
use pushdrop_lookup::storage::tokens::RocksTokenStore;

const OWNER_KEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const OTHER_KEY: &str = "0379be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fn service(dir: &TempDir, topics: &[&str]) -> TokenLookupService<RocksTokenStore> {
    let db = StorageHandler::open(dir.path().to_path_buf(), 8 * 1024 * 1024).unwrap();
    let store = RocksTokenStore::new(db, Some(1024 * 1024));

    TokenLookupService::new(
        store,
        LookupConfig {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            protocol: TokenProtocol::V1,
        },
    )
}

fn txid(marker: &str) -> Txid {
    Txid::from_str(&marker.repeat(32)).unwrap()
}

fn signature() -> Vec<u8> {
    let mut sig = vec![0x30, 0x44, 0x02, 0x20];
    sig.extend(std::iter::repeat_n(0x33, 32));
    sig.extend([0x02, 0x20]);
    sig.extend(std::iter::repeat_n(0x44, 32));
    sig
}

fn token_script_for(key: &str, amount: &str) -> ScriptBuf {
    let key = PublicKey::from_str(key).unwrap();

    pushdrop::build(&key, &[amount.as_bytes().to_vec()], &signature()).unwrap()
}

fn token_script(amount: &str) -> ScriptBuf {
    token_script_for(OWNER_KEY, amount)
}

#[tokio::test]
async fn add_lookup_spend_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let txid = txid("a1");

    service
        .output_added(txid, 0, &token_script("500"), "tokens")
        .await
        .unwrap();

    let records = service
        .lookup(Some(LookupQuery::by_outpoint(txid, 0)))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outpoint.txid(), txid);
    assert_eq!(records[0].outpoint.vout, 0);
    assert_eq!(records[0].amount, 500);
    assert_eq!(
        hex::encode(&records[0].owner_key),
        OWNER_KEY,
        "owner key should be the locking public key"
    );

    service.output_spent(txid, 0, "tokens").await.unwrap();

    let records = service
        .lookup(Some(LookupQuery::by_outpoint(txid, 0)))
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn unsubscribed_topic_notifications_are_noops() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    service
        .output_added(txid("b2"), 0, &token_script("100"), "songs")
        .await
        .unwrap();

    assert!(service.lookup(Some(LookupQuery::all())).await.unwrap().is_empty());

    // spends on foreign topics leave subscribed-topic state alone
    service
        .output_added(txid("b2"), 1, &token_script("100"), "tokens")
        .await
        .unwrap();
    service.output_spent(txid("b2"), 1, "songs").await.unwrap();

    assert_eq!(service.lookup(Some(LookupQuery::all())).await.unwrap().len(), 1);
}

#[tokio::test]
async fn spend_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let txid = txid("c3");

    service
        .output_added(txid, 2, &token_script("7"), "tokens")
        .await
        .unwrap();

    service.output_spent(txid, 2, "tokens").await.unwrap();
    service.output_spent(txid, 2, "tokens").await.unwrap();

    assert!(service
        .lookup(Some(LookupQuery::by_outpoint(txid, 2)))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_query_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    assert!(matches!(
        service.lookup(None).await,
        Err(Error::InvalidQuery)
    ));
}

#[tokio::test]
async fn underspecified_query_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    assert!(matches!(
        service.lookup(Some(LookupQuery::default())).await,
        Err(Error::InsufficientQueryParameters)
    ));

    // txid without vout is not a point query
    assert!(matches!(
        service
            .lookup(Some(LookupQuery {
                txid: Some(txid("d4")),
                vout: None,
                find_all: false,
            }))
            .await,
        Err(Error::InsufficientQueryParameters)
    ));
}

#[tokio::test]
async fn find_all_returns_every_live_record() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    service
        .output_added(txid("e5"), 0, &token_script("10"), "tokens")
        .await
        .unwrap();
    service
        .output_added(txid("e5"), 1, &token_script_for(OTHER_KEY, "20"), "tokens")
        .await
        .unwrap();
    service
        .output_added(txid("f6"), 0, &token_script("30"), "tokens")
        .await
        .unwrap();

    service.output_spent(txid("e5"), 1, "tokens").await.unwrap();

    let records = service.lookup(Some(LookupQuery::all())).await.unwrap();

    let live: HashSet<(Txid, u32, u64)> = records
        .iter()
        .map(|r| (r.outpoint.txid(), r.outpoint.vout, r.amount))
        .collect();

    let expected: HashSet<(Txid, u32, u64)> =
        [(txid("e5"), 0, 10), (txid("f6"), 0, 30)].into_iter().collect();

    assert_eq!(live, expected);
}

#[tokio::test]
async fn point_lookup_miss_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let records = service
        .lookup(Some(LookupQuery::by_outpoint(txid("a7"), 9)))
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn malformed_script_propagates_and_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let garbage = ScriptBuf::from_bytes(vec![0xff, 0xfe, 0xfd]);

    assert!(matches!(
        service.output_added(txid("b8"), 0, &garbage, "tokens").await,
        Err(Error::MalformedScript(_))
    ));

    assert!(service.lookup(Some(LookupQuery::all())).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_numeric_amount_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let script = token_script("not-a-number");

    assert!(matches!(
        service.output_added(txid("c9"), 0, &script, "tokens").await,
        Err(Error::InvalidTokenData(_))
    ));

    // the rejected notification must not create a partial record
    assert!(service.lookup(Some(LookupQuery::all())).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_amount_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let key = PublicKey::from_str(OWNER_KEY).unwrap();
    let script = pushdrop::build(&key, &[], &signature()).unwrap();

    assert!(matches!(
        service.output_added(txid("d1"), 0, &script, "tokens").await,
        Err(Error::InvalidTokenData(_))
    ));
}

#[tokio::test]
async fn re_adding_an_outpoint_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, &["tokens"]);

    let txid = txid("e2");

    service
        .output_added(txid, 0, &token_script("111"), "tokens")
        .await
        .unwrap();
    service
        .output_added(txid, 0, &token_script_for(OTHER_KEY, "222"), "tokens")
        .await
        .unwrap();

    let records = service
        .lookup(Some(LookupQuery::by_outpoint(txid, 0)))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, 222);
    assert_eq!(hex::encode(&records[0].owner_key), OTHER_KEY);

    assert_eq!(service.lookup(Some(LookupQuery::all())).await.unwrap().len(), 1);
}
