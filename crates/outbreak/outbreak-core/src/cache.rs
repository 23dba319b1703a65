//! Time-to-live cache in front of a series source.

use outbreak_spi::{Result, SeriesSnapshot, SeriesSource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry {
    loaded_at: Instant,
    snapshot: Arc<SeriesSnapshot>,
}

/// Reloads the wrapped source at most once per `ttl`.
///
/// Transforms never see the cache; they receive the snapshot it hands out,
/// which stays immutable for the whole request.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl<S: SeriesSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached snapshot so the next load hits the source.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Whether a snapshot younger than the TTL is cached.
    pub fn is_fresh(&self) -> bool {
        self.lock()
            .as_ref()
            .map_or(false, |entry| entry.loaded_at.elapsed() < self.ttl)
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SeriesSource> SeriesSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Serve the cached snapshot while fresh, otherwise reload.
    ///
    /// A failed reload keeps the stale snapshot for the next attempt.
    fn load(&self) -> Result<Arc<SeriesSnapshot>> {
        let mut slot = self.lock();
        if let Some(entry) = slot.as_ref() {
            if entry.loaded_at.elapsed() < self.ttl {
                tracing::trace!(source = self.inner.name(), "series cache hit");
                return Ok(Arc::clone(&entry.snapshot));
            }
        }

        tracing::debug!(source = self.inner.name(), ttl_secs = self.ttl.as_secs(), "reloading series");
        let snapshot = self.inner.load()?;
        *slot = Some(CacheEntry {
            loaded_at: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        Ok(snapshot)
    }
}
