use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Holds the cache's loading flag; released on drop.
///
/// At most one guard exists per flag at a time. It is `'static` so it can be
/// handed to a background task.
pub(crate) struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
