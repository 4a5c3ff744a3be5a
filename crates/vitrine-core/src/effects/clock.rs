//! Wall-clock access.

/// Source of wall-clock time in epoch millis.
///
/// Deliberately synchronous: toast expiry and freshness checks run inside
/// sync code paths, and a clock read has no business suspending. Handlers are
/// `SystemClock` for production and `SimulatedClock` for tests.
pub trait Clock: Send + Sync {
    /// Current time in epoch millis.
    fn now_ms(&self) -> i64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}
