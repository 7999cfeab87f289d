//! Reactive handlers that keep the UX state in step with the event bus.

mod event_handler;

pub use event_handler::EventHandler;
