use std::{fmt, io};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    log::{Clock, LogEntry, LogSink, SystemClock},
    Quantity,
};
use crate::errors::InputError;

const REPORT_TITLE: &str = "Items Report";

/// Result of a `remove` call that passed input validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Removal {
    /// The entry is still stocked with the remaining quantity.
    Decremented(Quantity),
    /// The entry dropped to zero or below and was deleted.
    Cleared,
    /// No entry existed; the ledger was left unchanged.
    Missing,
}

/// Insertion-ordered mapping from item name to quantity.
///
/// `remove` deletes entries that fall to zero or below. `add` does not, so a
/// negative add can leave a non-positive entry behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLedger {
    items: IndexMap<String, Quantity>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` to `item`, creating the entry when absent.
    pub fn add(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
    ) -> Result<LogEntry, InputError> {
        self.add_with_clock(item, quantity, &SystemClock)
    }

    /// Same as [`StockLedger::add`], recording the log entry into `sink`.
    pub fn add_logged(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
        sink: &mut impl LogSink,
    ) -> Result<(), InputError> {
        let entry = self.add(item, quantity)?;
        sink.record(entry);
        Ok(())
    }

    pub fn add_with_clock(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
        clock: &impl Clock,
    ) -> Result<LogEntry, InputError> {
        let quantity = quantity.into();
        if item.is_empty() {
            return Err(InputError::EmptyItem);
        }
        if !quantity.is_number() {
            return Err(InputError::NotANumber);
        }

        let slot = self.items.entry(item.to_string()).or_default();
        let total = *slot + quantity;
        *slot = total;
        debug!(item, %quantity, %total, "stock added");

        Ok(LogEntry {
            at: clock.now(),
            quantity,
            item: item.to_string(),
        })
    }

    /// Takes `quantity` away from `item`, deleting the entry once it reaches zero or below.
    pub fn remove(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
    ) -> Result<Removal, InputError> {
        let quantity = quantity.into();
        if !quantity.is_number() {
            return Err(InputError::NotANumber);
        }
        if !quantity.is_positive() {
            return Err(InputError::NonPositiveQuantity);
        }

        let Some(current) = self.items.get_mut(item) else {
            warn!(item, "Tried to remove non-existent item: {item}");
            return Ok(Removal::Missing);
        };

        let remaining = *current - quantity;
        *current = remaining;
        if remaining <= Quantity::ZERO {
            self.items.shift_remove(item);
            debug!(item, "stock cleared");
            Ok(Removal::Cleared)
        } else {
            debug!(item, %quantity, remaining = %remaining, "stock removed");
            Ok(Removal::Decremented(remaining))
        }
    }

    /// Current quantity for `item`, zero when it has no entry.
    pub fn quantity(&self, item: &str) -> Quantity {
        self.items.get(item).copied().unwrap_or(Quantity::ZERO)
    }

    /// Items whose quantity is strictly below `threshold`, in insertion order.
    pub fn low_stock(&self, threshold: impl Into<Quantity>) -> Vec<&str> {
        let threshold = threshold.into();
        self.items
            .iter()
            .filter(|(_, quantity)| **quantity < threshold)
            .map(|(item, _)| item.as_str())
            .collect()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.items
            .iter()
            .map(|(item, quantity)| (item.as_str(), *quantity))
    }

    /// Writes the human-readable listing of every entry.
    pub fn report(&self, out: &mut impl io::Write) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for StockLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        for (item, quantity) in self.iter() {
            writeln!(f, "{item} -> {quantity}")?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Quantity)> for StockLedger {
    fn from_iter<T: IntoIterator<Item = (String, Quantity)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
