//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before the next try, given how many attempts have already run.
///
/// Grows as `base_ms × 2^(attempts - 1)`, capped at `max_ms`, with up to 10%
/// jitter on top. Zero completed attempts means no delay.
pub fn calculate_backoff(attempts: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempts == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempts - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
