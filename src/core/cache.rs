//! Short-lived read cache for sheet lookups.

use crate::errors::AppResult;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Cached value if still fresh, otherwise `load` and remember the result.
    /// Failed loads are not cached.
    pub fn get_or_try_load<F>(&self, load: F) -> AppResult<T>
    where
        F: FnOnce() -> AppResult<T>,
    {
        let mut slot = self.slot.lock();

        if let Some((stored_at, value)) = slot.as_ref()
            && stored_at.elapsed() < self.ttl
        {
            return Ok(value.clone());
        }

        let value = load()?;
        *slot = Some((Instant::now(), value.clone()));
        Ok(value)
    }

    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::cell::Cell;

    #[test]
    fn loads_once_until_invalidated() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };

        assert_eq!(cache.get_or_try_load(load).unwrap(), 1);
        assert_eq!(cache.get_or_try_load(load).unwrap(), 1);
        cache.invalidate();
        assert_eq!(cache.get_or_try_load(load).unwrap(), 2);
    }

    #[test]
    fn zero_ttl_always_reloads_and_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::ZERO);
        assert!(
            cache
                .get_or_try_load(|| Err(AppError::Other("down".into())))
                .is_err()
        );
        assert_eq!(cache.get_or_try_load(|| Ok(7)).unwrap(), 7);
        assert_eq!(cache.get_or_try_load(|| Ok(8)).unwrap(), 8);
    }
}
