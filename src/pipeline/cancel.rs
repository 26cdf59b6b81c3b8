use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, checked by the engine before each pair.
///
/// Clones share the same flag, so a signal handler can hold one clone while
/// the engine checks another. A token built with `after_pairs` also trips
/// itself once that many pairs have been scored.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    remaining: Option<Arc<AtomicUsize>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that cancels the run after `limit` scored pairs.
    pub fn after_pairs(limit: usize) -> Self {
        let token = Self {
            flag: Arc::default(),
            remaining: Some(Arc::new(AtomicUsize::new(limit))),
        };
        if limit == 0 {
            token.cancel();
        }
        token
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Count one scored pair against the limit, if there is one.
    pub(crate) fn record_pair(&self) {
        let Some(remaining) = &self.remaining else {
            return;
        };
        let previous =
            remaining.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if previous == Ok(1) {
            self.cancel();
        }
    }
}
