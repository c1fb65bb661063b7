//! Wall-clock helpers. All persisted timestamps are Unix epoch milliseconds.

use chrono::Utc;

/// Returns the current time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
