#![doc(test(attr(deny(warnings))))]

//! Stock Ledger tracks item quantities in memory and persists the whole table
//! as a pretty-printed JSON snapshot.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{InputError, LedgerError};
pub use ledger::{LogEntry, Quantity, Removal, StockLedger};
pub use storage::JsonStore;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Stock Ledger tracing initialized.");
    });
}
