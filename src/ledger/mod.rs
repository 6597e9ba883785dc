//! Stock ledger model, quantities, and the add-log types.

pub mod log;
pub mod quantity;
pub mod stock;

pub use log::{Clock, FixedClock, LogEntry, LogSink, SystemClock};
pub use quantity::Quantity;
pub use stock::{Removal, StockLedger};
