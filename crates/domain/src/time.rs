//! Time and timestamp helpers.

use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for event times and response envelopes.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn epoch_millis(ts: Timestamp) -> i64 {
    ts.timestamp_millis()
}

/// Local wall-clock rendering used inside log-style telemetry payloads,
/// e.g. `16/10/2026 3:04:05 pm`.
#[must_use]
pub fn wall_clock(ts: Timestamp) -> String {
    ts.with_timezone(&Local)
        .format("%d/%m/%Y %-I:%M:%S %P")
        .to_string()
}
