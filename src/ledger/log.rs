use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::Quantity;

/// Clock abstracts access to the current timestamp so log entries remain deterministic in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Record of an applied `add`. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub quantity: Quantity,
    pub item: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Added {} of {}",
            self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.quantity,
            self.item
        )
    }
}

/// Destination for add-log entries supplied by the caller.
pub trait LogSink {
    fn record(&mut self, entry: LogEntry);
}

impl LogSink for Vec<LogEntry> {
    fn record(&mut self, entry: LogEntry) {
        self.push(entry);
    }
}

impl LogSink for Vec<String> {
    fn record(&mut self, entry: LogEntry) {
        self.push(entry.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn renders_timestamp_quantity_and_item() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let entry = LogEntry {
            at,
            quantity: Quantity::Int(10),
            item: "apple".into(),
        };
        assert_eq!(
            entry.to_string(),
            "2024-03-01T09:30:00.000Z: Added 10 of apple"
        );
    }

    #[test]
    fn string_sink_stores_rendered_entries() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut sink: Vec<String> = Vec::new();
        sink.record(LogEntry {
            at,
            quantity: Quantity::Float(0.5),
            item: "flour".into(),
        });
        assert_eq!(sink, vec!["2024-03-01T09:30:00.000Z: Added 0.5 of flour"]);
    }
}
