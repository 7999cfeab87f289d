//! Typed event bus for runtime events.
//!
//! Events form a closed set ([`DomainEvent`]); listeners subscribe by
//! [`EventKind`] and receive an [`EventEnvelope`] with the emission time.

mod bus;
mod listener;
mod types;

pub use bus::EventBus;
pub use listener::{ListenerId, ListenerResult, Subscription};
pub use types::{DomainEvent, EventEnvelope, EventKind};

pub(crate) use listener::call_isolated;
