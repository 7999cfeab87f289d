//! Listener plumbing shared by the event bus and the state store.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// What a listener returns. An `Err` is logged, never propagated.
pub type ListenerResult = anyhow::Result<()>;

/// Identity of a registered listener, used for exact removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Returned by registration. Dropping it keeps the listener registered;
/// call [`Subscription::unsubscribe`] to remove it.
#[must_use = "dropping a Subscription keeps the listener; keep it to unsubscribe later"]
pub struct Subscription {
    id: ListenerId,
    cancel: Box<dyn FnOnce() + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            id,
            cancel: Box::new(cancel),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// How a listener failed.
#[derive(Debug)]
pub(crate) enum ListenerFailure {
    Error(anyhow::Error),
    Panic(String),
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => write!(f, "{err:#}"),
            Self::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

/// Runs one listener, turning both errors and panics into a value.
pub(crate) fn call_isolated<T: ?Sized>(
    listener: &(dyn Fn(&T) -> ListenerResult + Send + Sync),
    payload: &T,
) -> Result<(), ListenerFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener(payload))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(ListenerFailure::Error(err)),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|text| (*text).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ListenerFailure::Panic(message))
        }
    }
}
