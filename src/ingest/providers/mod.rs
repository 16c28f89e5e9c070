pub mod app_store;
pub mod play_store;

use chrono::{DateTime, Duration, Utc};

/// Oldest instant an adapter bothers returning for a `days` window hint.
/// One extra day of slack keeps the exact day cut inside the time-window filter.
pub(crate) fn hint_cutoff(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(Duration::days(i64::from(days) + 1))
}
