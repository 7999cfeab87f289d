//! Subscription handles.

use std::fmt;

/// Live log subscription. Dropping the handle unsubscribes.
pub struct WatchHandle {
    unwatch: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    pub fn new(unwatch: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unwatch: Some(Box::new(unwatch)),
        }
    }

    /// A handle with nothing to release.
    pub fn detached() -> Self {
        Self { unwatch: None }
    }

    pub fn unwatch(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unwatch) = self.unwatch.take() {
            unwatch();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.unwatch.is_some())
            .finish()
    }
}
