//! Customer-facing order numbers: `<PREFIX>-<last six digits of epoch ms>`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::model::OrderId;

/// Issues time-derived order ids that never repeat a millisecond.
///
/// When two requests land in the same millisecond (or the clock steps back)
/// the generator moves one millisecond past the last value it handed out.
/// The six-digit suffix still wraps every ~16 minutes, so callers check the
/// ledger and ask again on a collision.
#[derive(Debug, Clone)]
pub struct OrderIdGenerator {
    prefix: Arc<str>,
    last_millis: Arc<AtomicU64>,
}

impl OrderIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix.trim()),
            last_millis: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn next_id(&self) -> OrderId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let millis = self.advance(now);
        OrderId(format!("{}-{:06}", self.prefix, millis % 1_000_000))
    }

    fn advance(&self, now: u64) -> u64 {
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}
