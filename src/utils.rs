//! Monotonic timestamp source shared by the engine and its order books.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

static EPOCH: OnceLock<(Instant, u64)> = OnceLock::new();

/// Milliseconds since the Unix epoch, derived from a monotonic clock.
///
/// `created_at`/`updated_at`/`executed_at` timestamps are observational
/// only; admission order under a book's writer lock, not wall-clock
/// values, determines price-time priority (see [`crate::orderbook::book`]).
/// Anchoring to [`Instant`] keeps the sequence monotone even if the
/// system clock is stepped backwards.
pub fn now_millis() -> u64 {
    let (anchor, anchor_epoch_ms) = EPOCH.get_or_init(|| {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        (Instant::now(), epoch_ms)
    });
    anchor_epoch_ms + anchor.elapsed().as_millis() as u64
}
