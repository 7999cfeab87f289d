//! Folds domain events into the UX state.

use std::sync::Arc;

use strum::IntoEnumIterator;

use game_core::OperationKind;

use crate::events::{DomainEvent, EventBus, EventEnvelope, EventKind, Subscription};
use crate::state::{StateStore, UxStatePatch};

/// Keeps the store in step with the bus.
///
/// One listener is registered per [`EventKind`]; all of them dispatch through
/// the same exhaustive match, so a new event variant does not compile until
/// it is handled here. A successful tracked operation additionally produces
/// the family event (`CharacterCreated`, `FightStarted`, ...) that the
/// operation itself never emits.
pub struct EventHandler {
    subscriptions: Vec<Subscription>,
}

impl EventHandler {
    pub fn attach(store: StateStore, bus: &EventBus) -> Self {
        let folder = Arc::new(Folder {
            store,
            bus: bus.clone(),
        });

        let subscriptions = EventKind::iter()
            .map(|kind| {
                let folder = Arc::clone(&folder);
                bus.on(kind, move |envelope: &EventEnvelope| {
                    folder.handle(&envelope.event);
                    Ok(())
                })
            })
            .collect();

        Self { subscriptions }
    }

    /// Removes every listener this handler registered.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.release();
    }
}

struct Folder {
    store: StateStore,
    bus: EventBus,
}

impl Folder {
    fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::CharacterCreated { .. } => self.apply(
                UxStatePatch::new()
                    .last_fight_summary(None)
                    .status_message("Character created successfully"),
            ),
            DomainEvent::CharacterUpdated { .. } => {
                self.store.set_status_message("Character updated");
            }
            DomainEvent::FightStarted { .. } => self.store.set_status_message("Fight started"),
            DomainEvent::FightCompleted { summary } => self.apply(
                UxStatePatch::new()
                    .last_fight_summary(Some(summary.as_ref().clone()))
                    .status_message("Fight completed"),
            ),
            DomainEvent::EquipmentDropped { drop } => {
                let message = if drop.description.is_empty() {
                    "Equipment dropped".to_string()
                } else {
                    format!("Equipment dropped: {}", drop.description)
                };
                if !self.store.attach_equipment_drop(drop.clone()) {
                    tracing::debug!(
                        target: "runtime::handler",
                        "equipment drop recorded without a matching fight summary"
                    );
                }
                self.store.set_status_message(message);
            }
            DomainEvent::HealingStarted { .. } => {
                self.store.set_status_message("Healing in progress...");
            }
            DomainEvent::HealingCompleted { healing } => self.apply(
                UxStatePatch::new()
                    .last_healing(Some(healing.clone()))
                    .status_message("Character healed successfully"),
            ),
            DomainEvent::ResurrectionStarted { .. } => {
                self.store.set_status_message("Resurrection in progress...");
            }
            DomainEvent::ResurrectionCompleted { resurrection } => self.apply(
                UxStatePatch::new()
                    .last_resurrection(Some(resurrection.clone()))
                    .status_message("Character resurrected successfully"),
            ),
            DomainEvent::OperationStarted { progress, .. } => {
                self.store.set_status_message(progress.clone());
            }
            DomainEvent::OperationCompleted { kind, transaction } => {
                self.store.set_status_message("Operation completed");
                if let Some(event) = family_event(*kind, transaction.clone()) {
                    self.bus.emit(event);
                }
            }
            DomainEvent::OperationFailed { error, .. } => {
                self.store
                    .set_status_message(format!("Operation failed: {error}"));
            }
            DomainEvent::PoolsUpdated { .. } => self.store.set_status_message("Pools updated"),
            DomainEvent::LeaderboardUpdated { .. } => {
                self.store.set_status_message("Leaderboard updated");
            }
            DomainEvent::ClaimsUpdated { .. } => self.store.set_status_message("Claims updated"),
            DomainEvent::ClaimStarted { .. } => self.store.set_status_message("Claiming reward..."),
            DomainEvent::ClaimCompleted { .. } => {
                self.store.set_status_message("Reward claimed successfully");
            }
            DomainEvent::ClaimFailed { .. } => self.store.set_status_message("Claim failed"),
            DomainEvent::StateChanged { .. } => {}
            DomainEvent::ErrorOccurred { message, .. } => self.apply(
                UxStatePatch::new()
                    .error(Some(message.clone()))
                    .status_message(format!("Error: {message}")),
            ),
        }
    }

    fn apply(&self, patch: UxStatePatch) {
        if let Err(err) = self.store.batch_update(patch) {
            tracing::warn!(target: "runtime::handler", error = %err, "event fold refused");
        }
    }
}

/// The family event announced by a successful write.
fn family_event(
    kind: OperationKind,
    transaction: Option<game_core::TxHash>,
) -> Option<DomainEvent> {
    match kind {
        OperationKind::CreateCharacter => Some(DomainEvent::CharacterCreated { transaction }),
        OperationKind::FightEnemy => Some(DomainEvent::FightStarted { transaction }),
        OperationKind::HealCharacter => Some(DomainEvent::HealingStarted { transaction }),
        OperationKind::ResurrectCharacter => Some(DomainEvent::ResurrectionStarted { transaction }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use game_core::{EquipmentDropData, FightSummaryData, HealingData, TxHash};

    fn attached() -> (StateStore, EventBus, EventHandler) {
        let store = StateStore::new();
        let bus = EventBus::new();
        let handler = EventHandler::attach(store.clone(), &bus);
        (store, bus, handler)
    }

    fn recorded(bus: &EventBus, kind: EventKind) -> (Arc<Mutex<Vec<DomainEvent>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = bus.on(kind, move |envelope| {
            sink.lock().unwrap().push(envelope.event.clone());
            Ok(())
        });
        (seen, subscription)
    }

    #[test]
    fn registers_one_listener_per_kind() {
        let (_store, bus, handler) = attached();
        for kind in EventKind::iter() {
            assert_eq!(bus.listener_count(kind), 1, "{kind}");
        }

        handler.detach();
        assert!(bus.event_names().is_empty());
    }

    #[test]
    fn successful_create_announces_character_created() {
        let (store, bus, _handler) = attached();
        store.set_last_fight_summary(Some(FightSummaryData::default()));
        let (created, _sub) = recorded(&bus, EventKind::CharacterCreated);

        bus.emit(DomainEvent::OperationCompleted {
            kind: OperationKind::CreateCharacter,
            transaction: Some(TxHash("0xabc".into())),
        });

        let created = created.lock().unwrap();
        assert_eq!(
            *created,
            vec![DomainEvent::CharacterCreated {
                transaction: Some(TxHash("0xabc".into()))
            }]
        );
        assert!(store.last_fight_summary().is_none());
        assert_eq!(store.status_message(), "Character created successfully");
    }

    #[test]
    fn reads_do_not_announce_family_events() {
        let (_store, bus, _handler) = attached();
        let (started, _sub) = recorded(&bus, EventKind::FightStarted);

        bus.emit(DomainEvent::OperationCompleted {
            kind: OperationKind::ContinueFight,
            transaction: Some(TxHash("0x1".into())),
        });
        bus.emit(DomainEvent::OperationCompleted {
            kind: OperationKind::LoadPools,
            transaction: None,
        });

        assert!(started.lock().unwrap().is_empty());
    }

    #[test]
    fn fight_summary_then_drop_attaches_equipment() {
        let (store, bus, _handler) = attached();
        let tx = TxHash("0xfight".into());

        bus.emit(DomainEvent::FightCompleted {
            summary: Box::new(FightSummaryData {
                victory: true,
                transaction: Some(tx.clone()),
                ..Default::default()
            }),
        });
        bus.emit(DomainEvent::EquipmentDropped {
            drop: EquipmentDropData {
                bonuses: vec![3, 1, 0, 2],
                description: "Iron gauntlets".into(),
                transaction: Some(tx),
            },
        });

        let summary = store.last_fight_summary().unwrap();
        assert!(summary.victory);
        assert!(summary.equipment_dropped.is_some());
        assert_eq!(store.status_message(), "Equipment dropped: Iron gauntlets");
    }

    #[test]
    fn healing_completion_is_recorded() {
        let (store, bus, _handler) = attached();

        bus.emit(DomainEvent::HealingCompleted {
            healing: HealingData {
                new_endurance: 90,
                cost: 1,
            },
        });

        assert_eq!(store.last_healing().unwrap().new_endurance, 90);
        assert_eq!(store.status_message(), "Character healed successfully");
    }

    #[test]
    fn errors_land_in_the_error_slot() {
        let (store, bus, _handler) = attached();

        bus.emit(DomainEvent::ErrorOccurred {
            message: "ledger unreachable".into(),
            code: None,
        });

        assert_eq!(store.error().as_deref(), Some("ledger unreachable"));
        assert_eq!(store.status_message(), "Error: ledger unreachable");
    }

    #[test]
    fn dropped_handler_stops_folding() {
        let (store, bus, handler) = attached();
        drop(handler);

        bus.emit(DomainEvent::PoolsUpdated {
            pools: Default::default(),
        });

        assert_eq!(store.status_message(), "Initializing...");
    }
}
