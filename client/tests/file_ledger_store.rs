//! File-backed ledger behaviour across process restarts.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use signup_client::domain::{
    LEDGER_STORAGE_KEY, LedgerCache, LedgerCacheError, PaymentRecord, Publication, PublicationId,
};
use signup_client::outbound::storage::FileLedgerStore;
use tempfile::TempDir;

struct LedgerDir {
    _temp: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn ledger_dir() -> LedgerDir {
    let temp = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("ledger"))
        .expect("temp path should be UTF-8");
    LedgerDir { _temp: temp, path }
}

fn open_cache(dir: &LedgerDir) -> LedgerCache<FileLedgerStore> {
    let store = FileLedgerStore::open(&dir.path).expect("open ledger directory");
    LedgerCache::new(Arc::new(store))
}

fn record(name: &str, price: u32, day: u32) -> PaymentRecord {
    let id = PublicationId::new(name.to_lowercase().replace(' ', "-")).expect("valid id");
    let publication =
        Publication::try_new(id, name, "en", Decimal::from(price)).expect("valid publication");
    let now = Utc
        .with_ymd_and_hms(2026, 1, day, 12, 0, 0)
        .single()
        .expect("valid instant");
    PaymentRecord::for_confirmed_subscription(&publication, now)
}

#[rstest]
fn appended_records_survive_reopening(ledger_dir: LedgerDir) {
    {
        let cache = open_cache(&ledger_dir);
        assert_eq!(cache.append(record("Daily Times", 100, 1)).expect("append"), 1);
        assert_eq!(cache.append(record("Weekly Post", 40, 2)).expect("append"), 2);
    }

    let reopened = open_cache(&ledger_dir);
    let names: Vec<_> = reopened
        .records()
        .expect("ledger readable")
        .into_iter()
        .map(|r| r.subscription_name)
        .collect();
    assert_eq!(names, ["Daily Times", "Weekly Post"]);

    assert_eq!(reopened.append(record("Daily Times", 100, 3)).expect("append"), 3);
}

#[rstest]
fn ledger_is_stored_as_a_json_array(ledger_dir: LedgerDir) {
    let cache = open_cache(&ledger_dir);
    cache.append(record("Daily Times", 100, 1)).expect("append");

    let raw = std::fs::read_to_string(ledger_dir.path.join(format!("{LEDGER_STORAGE_KEY}.json")))
        .expect("ledger file written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let entries = value.as_array().expect("ledger is an array");
    assert_eq!(entries.len(), 1);
    let entry = entries.first().expect("one entry");
    assert_eq!(entry["subscriptionName"], "Daily Times");
    assert_eq!(entry["status"], "paid");
}

#[rstest]
fn corrupt_ledger_file_is_reported_and_left_alone(ledger_dir: LedgerDir) {
    std::fs::create_dir_all(&ledger_dir.path).expect("create ledger dir");
    let file = ledger_dir.path.join(format!("{LEDGER_STORAGE_KEY}.json"));
    std::fs::write(&file, "{not json").expect("seed corrupt ledger");

    let cache = open_cache(&ledger_dir);
    let err = cache
        .append(record("Daily Times", 100, 1))
        .expect_err("corrupt ledger must not be overwritten");

    assert!(matches!(err, LedgerCacheError::Corrupt { .. }));
    assert_eq!(
        std::fs::read_to_string(&file).expect("ledger still present"),
        "{not json"
    );
}

#[rstest]
fn clearing_removes_the_ledger_file(ledger_dir: LedgerDir) {
    let cache = open_cache(&ledger_dir);
    cache.append(record("Daily Times", 100, 1)).expect("append");
    cache.clear().expect("clear");

    assert!(!ledger_dir.path.join(format!("{LEDGER_STORAGE_KEY}.json")).exists());
    assert!(open_cache(&ledger_dir).records().expect("readable").is_empty());
}
