//! Daily liveness message.

use chrono::{DateTime, Timelike, Utc};

/// Minutes after midnight UTC during which a run sends the heartbeat. With a
/// ten minute schedule exactly one run lands inside the window.
pub const HEARTBEAT_WINDOW_MINUTES: u32 = 10;

pub fn is_heartbeat_window(now: DateTime<Utc>) -> bool {
    now.hour() == 0 && now.minute() < HEARTBEAT_WINDOW_MINUTES
}
