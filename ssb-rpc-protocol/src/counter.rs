//! Request number allocation.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<RequestCounter>> = OnceLock::new();

/// Hands out request numbers for outgoing requests.
///
/// Numbers start at 1 and grow by one per call. Once the counter passes
/// `i32::MAX` it wraps negative; the next caller then resets it to 1 and
/// receives 1, so numbers are only unique between wraparounds.
#[derive(Debug)]
pub struct RequestCounter {
    next: AtomicI32,
}

impl RequestCounter {
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a counter whose next value is `value`.
    ///
    /// A value below 1 behaves like a counter that has just wrapped.
    pub const fn starting_at(value: i32) -> Self {
        Self {
            next: AtomicI32::new(value),
        }
    }

    /// Process-wide counter shared by every caller that asks for it.
    pub fn global() -> Arc<RequestCounter> {
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Returns the next request number, always >= 1.
    pub fn next(&self) -> i32 {
        // fetch_add wraps on overflow
        let number = self.next.fetch_add(1, Ordering::Relaxed);
        if number < 1 {
            self.next.store(1, Ordering::Relaxed);
            tracing::warn!(number, "request counter wrapped, resetting to 1");
            return 1;
        }
        number
    }

    /// Value the next call to [`next`](Self::next) will start from.
    pub fn peek(&self) -> i32 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for RequestCounter {
    fn default() -> Self {
        Self::new()
    }
}
