use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry {
    rate: f64,
    fetched_at: Instant,
}

/// Time-bounded cache for the single BTC/ZEC rate.
///
/// One logical slot: a successful fetch overwrites the previous entry.
/// An entry is readable only while `now - fetched_at < ttl`.
pub struct RateCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Option<f64> {
        let slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                debug!("Cache HIT");
                Some(entry.rate)
            }
            Some(_) => {
                debug!("Cache entry expired");
                None
            }
            None => {
                debug!("Cache MISS");
                None
            }
        }
    }

    pub async fn put(&self, rate: f64) {
        let mut slot = self.slot.lock().await;
        debug!(rate, "Cache PUT");
        *slot = Some(CacheEntry {
            rate,
            fetched_at: Instant::now(),
        });
    }

    /// Number of non-expired entries (0 or 1), for status reporting.
    pub async fn len(&self) -> usize {
        let slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => 1,
            _ => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
