//! Synchronous, typed publish/subscribe hub.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::listener::{ListenerId, ListenerResult, Subscription, call_isolated};
use super::types::{DomainEvent, EventEnvelope, EventKind};

type EventListener = Arc<dyn Fn(&EventEnvelope) -> ListenerResult + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    by_kind: BTreeMap<EventKind, Vec<(ListenerId, EventListener)>>,
    any: Vec<(ListenerId, EventListener)>,
}

impl Registry {
    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.by_kind.remove(&kind);
        }
        removed
    }

    fn remove_any(&mut self, id: ListenerId) -> bool {
        let before = self.any.len();
        self.any.retain(|(listener_id, _)| *listener_id != id);
        self.any.len() != before
    }
}

/// Event bus.
///
/// Listeners for a kind run synchronously in registration order, followed by
/// the wildcard listeners from [`EventBus::on_any`]. Each emission works on a
/// snapshot of the listener lists taken when it starts, so registering or
/// removing listeners from inside a listener takes effect on the next
/// emission. A listener that returns `Err` or panics is logged and skipped;
/// the remaining listeners still run.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `listener` for one event kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: Fn(&EventEnvelope) -> ListenerResult + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry();
            let id = registry.allocate();
            registry
                .by_kind
                .entry(kind)
                .or_default()
                .push((id, Arc::new(listener)));
            id
        };

        let registry = Arc::downgrade(&self.registry);
        Subscription::new(id, move || {
            with_registry(&registry, |registry| {
                registry.remove(kind, id);
            });
        })
    }

    /// Removes exactly the listener registered under `id`.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.registry().remove(kind, id)
    }

    /// Registers a listener for every event kind.
    pub fn on_any<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&EventEnvelope) -> ListenerResult + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry();
            let id = registry.allocate();
            registry.any.push((id, Arc::new(listener)));
            id
        };

        let registry = Arc::downgrade(&self.registry);
        Subscription::new(id, move || {
            with_registry(&registry, |registry| {
                registry.remove_any(id);
            });
        })
    }

    pub fn off_any(&self, id: ListenerId) -> bool {
        self.registry().remove_any(id)
    }

    /// Publishes `event` and returns how many listeners failed.
    pub fn emit(&self, event: DomainEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        let kind = envelope.kind();

        let listeners: Vec<(ListenerId, EventListener)> = {
            let registry = self.registry();
            registry
                .by_kind
                .get(&kind)
                .into_iter()
                .flatten()
                .chain(registry.any.iter())
                .map(|(id, listener)| (*id, Arc::clone(listener)))
                .collect()
        };

        tracing::trace!(target: "runtime::bus", event = %kind, listeners = listeners.len(), "emit");

        let mut failures = 0;
        for (id, listener) in listeners {
            if let Err(failure) = call_isolated(listener.as_ref(), &envelope) {
                failures += 1;
                tracing::error!(
                    target: "runtime::bus",
                    event = %kind,
                    listener = id.0,
                    error = %failure,
                    "event listener failed"
                );
            }
        }
        failures
    }

    /// Listeners registered for `kind`, not counting wildcard listeners.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry().by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Kinds with at least one listener, in declaration order.
    pub fn event_names(&self) -> Vec<EventKind> {
        self.registry().by_kind.keys().copied().collect()
    }

    pub fn remove_all_listeners(&self) {
        let mut registry = self.registry();
        registry.by_kind.clear();
        registry.any.clear();
    }
}

fn with_registry(registry: &Weak<Mutex<Registry>>, f: impl FnOnce(&mut Registry)) {
    if let Some(registry) = registry.upgrade() {
        let mut guard = registry.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&EventEnvelope) -> ListenerResult + Send + Sync) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move |_: &EventEnvelope| {
            inner.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn status(text: &str) -> DomainEvent {
        DomainEvent::StateChanged {
            status_message: text.to_string(),
        }
    }

    #[test]
    fn failing_listener_does_not_block_the_next_one() {
        let bus = EventBus::new();
        let _panicking = bus.on(EventKind::StateChanged, |_| panic!("listener exploded"));
        let _erroring = bus.on(EventKind::StateChanged, |_| anyhow::bail!("listener refused"));
        let (count, listener) = counter();
        let _ok = bus.on(EventKind::StateChanged, listener);

        let failures = bus.emit(status("tick"));

        assert_eq!(failures, 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            let _ = bus.on(EventKind::PoolsUpdated, move |_| {
                order.lock().unwrap().push(label);
                Ok(())
            });
        }

        bus.emit(DomainEvent::PoolsUpdated {
            pools: Default::default(),
        });

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn off_removes_only_the_matching_listener() {
        let bus = EventBus::new();
        let (kept, kept_listener) = counter();
        let (removed, removed_listener) = counter();
        let _kept = bus.on(EventKind::StateChanged, kept_listener);
        let gone = bus.on(EventKind::StateChanged, removed_listener);

        assert!(bus.off(EventKind::StateChanged, gone.id()));
        assert!(!bus.off(EventKind::StateChanged, gone.id()));
        bus.emit(status("after off"));

        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(removed.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count(EventKind::StateChanged), 1);
    }

    #[test]
    fn unsubscribe_during_emission_applies_to_next_emission() {
        let bus = EventBus::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (count, listener) = counter();

        let remover_slot = Arc::clone(&slot);
        let _remover = bus.on(EventKind::StateChanged, move |_| {
            if let Some(subscription) = remover_slot.lock().unwrap().take() {
                subscription.unsubscribe();
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(bus.on(EventKind::StateChanged, listener));

        bus.emit(status("one"));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        bus.emit(status("two"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(EventKind::StateChanged), 1);
    }

    #[test]
    fn wildcard_listeners_see_every_kind() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        let any = bus.on_any(listener);

        bus.emit(status("a"));
        bus.emit(DomainEvent::ClaimStarted { epoch: 1, index: 0 });
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(bus.event_names().is_empty());

        any.unsubscribe();
        bus.emit(status("b"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn event_names_track_registered_kinds() {
        let bus = EventBus::new();
        let claims = bus.on(EventKind::ClaimsUpdated, |_| Ok(()));
        let _errors = bus.on(EventKind::ErrorOccurred, |_| Ok(()));

        assert_eq!(
            bus.event_names(),
            vec![EventKind::ClaimsUpdated, EventKind::ErrorOccurred]
        );

        claims.unsubscribe();
        assert_eq!(bus.event_names(), vec![EventKind::ErrorOccurred]);
    }
}
