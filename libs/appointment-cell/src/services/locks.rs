use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per calendar date. Bookings for the same date run one at a
/// time; different dates do not contend.
#[derive(Default)]
pub struct DateLocks {
    locks: Mutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

impl DateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, date: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(date).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops locks for dates before `today` that nobody is holding.
    pub fn prune_before(&self, today: NaiveDate) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|date, lock| *date >= today || Arc::strong_count(lock) > 1);
    }

    pub fn tracked_dates(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use shared_utils::test_utils::TestCalendar;

    #[tokio::test]
    async fn test_same_date_is_exclusive() {
        let locks = Arc::new(DateLocks::new());
        let guard = locks.acquire(TestCalendar::next_monday()).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(TestCalendar::next_monday()).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_dates_do_not_contend() {
        let locks = DateLocks::new();
        let _monday = locks.acquire(TestCalendar::next_monday()).await;
        let tuesday = tokio::time::timeout(
            Duration::from_millis(200),
            locks.acquire(TestCalendar::next_tuesday()),
        )
        .await;
        assert!(tuesday.is_ok());
    }

    #[tokio::test]
    async fn test_prune_keeps_held_and_future_locks() {
        let locks = DateLocks::new();
        drop(locks.acquire(TestCalendar::yesterday()).await);
        let _held = locks.acquire(TestCalendar::next_monday()).await;
        assert_eq!(locks.tracked_dates(), 2);

        locks.prune_before(TestCalendar::today());
        assert_eq!(locks.tracked_dates(), 1);
    }
}
