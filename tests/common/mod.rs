#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use stock_ledger::{JsonStore, StockLedger};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique directory that lives until the test binary exits.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Store pointed at `inventory.json` inside a fresh temp directory.
pub fn setup_store() -> JsonStore {
    JsonStore::new(temp_dir().join("inventory.json"))
}

/// Ledger after the sample scenario: apple 7, banana 2, mango 1.
pub fn sample_ledger() -> StockLedger {
    let mut ledger = StockLedger::new();
    ledger.add("apple", 10).expect("add apple");
    ledger.add("banana", 2).expect("add banana");
    ledger.add("mango", 1).expect("add mango");
    ledger.remove("apple", 3).expect("remove apple");
    ledger
}
