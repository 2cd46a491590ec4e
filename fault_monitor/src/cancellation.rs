use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Cooperative stop signal shared by the monitor's loops.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        let (lock, condvar) = &*self.inner;
        *lock.lock() = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Sleeps for `timeout` or until cancelled, whichever comes first.
    /// Returns whether the token has been cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, condvar) = &*self.inner;
        let mut cancelled = lock.lock();
        condvar.wait_while_for(&mut cancelled, |cancelled| !*cancelled, timeout);
        *cancelled
    }
}
