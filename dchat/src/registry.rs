//! Session registry contracts and a basic in-memory implementation.
//!
//! The registry is the only owner of turn content. Readers get cloned snapshots; writers go
//! through [`SessionRegistry::append`], [`SessionRegistry::append_exchange`],
//! [`SessionRegistry::update_at`], and [`SessionRegistry::clear`].
//!
//! ```rust
//! use dchat::{InMemorySessionRegistry, SessionRegistry, Turn, TurnPatch};
//! use dcommon::SessionId;
//!
//! let registry = InMemorySessionRegistry::new();
//! let session = SessionId::from("s1");
//! registry.open(&session).unwrap();
//!
//! let target = registry.append(&session, Turn::user("now", "hi", false)).unwrap();
//! assert_eq!(target.index, 0);
//!
//! registry.clear(&session).unwrap();
//! assert!(!registry.update_at(&target, TurnPatch::partial("late")).unwrap());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use dcommon::{Registry, SessionId};

use crate::{ChatError, Session, Turn, TurnPatch, TurnTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    Opened,
    Appended { index: usize },
    Updated { index: usize },
    Cleared,
}

/// Notified after a registry mutation, outside the registry lock.
pub trait RegistryObserver: Send + Sync {
    fn on_change(&self, session_id: &SessionId, change: RegistryChange);
}

pub trait SessionRegistry: Send + Sync {
    /// Creates the session if absent and returns its current generation.
    fn open(&self, session_id: &SessionId) -> Result<u64, ChatError>;

    fn append(&self, session_id: &SessionId, turn: Turn) -> Result<TurnTarget, ChatError>;

    /// Appends `user` and the turn `placeholder` builds from the turns committed before it, as
    /// one step. No other append lands between the two. Returns the placeholder's target.
    fn append_exchange(
        &self,
        session_id: &SessionId,
        user: Turn,
        placeholder: &dyn Fn(&[Turn]) -> Turn,
    ) -> Result<TurnTarget, ChatError>;

    /// Returns `Ok(false)` without touching anything when the target no longer resolves to a
    /// pending turn: unknown session, stale generation, out-of-range index, or terminal turn.
    fn update_at(&self, target: &TurnTarget, patch: TurnPatch) -> Result<bool, ChatError>;

    fn clear(&self, session_id: &SessionId) -> Result<(), ChatError>;

    fn list_for(&self, session_id: &SessionId) -> Result<Vec<Turn>, ChatError>;

    fn session_ids(&self) -> Result<Vec<SessionId>, ChatError>;

    fn snapshot(&self) -> Result<Vec<Session>, ChatError>;

    fn subscribe(&self, observer: Arc<dyn RegistryObserver>) -> Result<(), ChatError>;
}

#[derive(Debug, Default)]
struct SessionSlot {
    generation: u64,
    turns: Vec<Turn>,
}

#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: Mutex<Registry<SessionId, SessionSlot>>,
    observers: Mutex<Vec<Arc<dyn RegistryObserver>>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates a registry from previously exported sessions.
    pub fn from_sessions(sessions: impl IntoIterator<Item = Session>) -> Self {
        let mut slots = Registry::new();
        for session in sessions {
            slots.insert(
                session.id,
                SessionSlot {
                    generation: session.generation,
                    turns: session.turns,
                },
            );
        }

        Self {
            sessions: Mutex::new(slots),
            observers: Mutex::new(Vec::new()),
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, Registry<SessionId, SessionSlot>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|_| ChatError::store("session registry lock poisoned"))
    }

    fn notify(&self, session_id: &SessionId, change: RegistryChange) -> Result<(), ChatError> {
        let observers = self
            .observers
            .lock()
            .map_err(|_| ChatError::store("registry observer lock poisoned"))?
            .clone();

        for observer in observers {
            observer.on_change(session_id, change);
        }

        Ok(())
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn open(&self, session_id: &SessionId) -> Result<u64, ChatError> {
        let (generation, created) = {
            let mut sessions = self.sessions()?;
            let created = !sessions.contains_key(session_id);
            let slot = sessions.get_or_insert_with(session_id.clone(), SessionSlot::default);
            (slot.generation, created)
        };

        if created {
            self.notify(session_id, RegistryChange::Opened)?;
        }

        Ok(generation)
    }

    fn append(&self, session_id: &SessionId, turn: Turn) -> Result<TurnTarget, ChatError> {
        let target = {
            let mut sessions = self.sessions()?;
            let slot = sessions
                .get_mut(session_id)
                .ok_or_else(|| ChatError::unknown_session(session_id))?;

            slot.turns.push(turn);
            TurnTarget::new(session_id, slot.turns.len() - 1, slot.generation)
        };

        self.notify(
            session_id,
            RegistryChange::Appended {
                index: target.index,
            },
        )?;

        Ok(target)
    }

    fn append_exchange(
        &self,
        session_id: &SessionId,
        user: Turn,
        placeholder: &dyn Fn(&[Turn]) -> Turn,
    ) -> Result<TurnTarget, ChatError> {
        let target = {
            let mut sessions = self.sessions()?;
            let slot = sessions
                .get_mut(session_id)
                .ok_or_else(|| ChatError::unknown_session(session_id))?;

            let reply = placeholder(&slot.turns);
            slot.turns.push(user);
            slot.turns.push(reply);
            TurnTarget::new(session_id, slot.turns.len() - 1, slot.generation)
        };

        for index in [target.index - 1, target.index] {
            self.notify(session_id, RegistryChange::Appended { index })?;
        }

        Ok(target)
    }

    fn update_at(&self, target: &TurnTarget, patch: TurnPatch) -> Result<bool, ChatError> {
        let applied = {
            let mut sessions = self.sessions()?;
            match sessions.get_mut(&target.session_id) {
                Some(slot) if slot.generation == target.generation => slot
                    .turns
                    .get_mut(target.index)
                    .is_some_and(|turn| turn.apply(patch)),
                _ => false,
            }
        };

        if applied {
            self.notify(
                &target.session_id,
                RegistryChange::Updated {
                    index: target.index,
                },
            )?;
        }

        Ok(applied)
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), ChatError> {
        let cleared = {
            let mut sessions = self.sessions()?;
            match sessions.get_mut(session_id) {
                Some(slot) => {
                    slot.turns.clear();
                    slot.generation += 1;
                    true
                }
                None => false,
            }
        };

        if cleared {
            self.notify(session_id, RegistryChange::Cleared)?;
        }

        Ok(())
    }

    fn list_for(&self, session_id: &SessionId) -> Result<Vec<Turn>, ChatError> {
        let sessions = self.sessions()?;
        Ok(sessions
            .get(session_id)
            .map(|slot| slot.turns.clone())
            .unwrap_or_default())
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, ChatError> {
        let sessions = self.sessions()?;
        Ok(sessions.keys().cloned().collect())
    }

    fn snapshot(&self) -> Result<Vec<Session>, ChatError> {
        let sessions = self.sessions()?;
        Ok(sessions
            .iter()
            .map(|(id, slot)| Session {
                id: id.clone(),
                generation: slot.generation,
                turns: slot.turns.clone(),
            })
            .collect())
    }

    fn subscribe(&self, observer: Arc<dyn RegistryObserver>) -> Result<(), ChatError> {
        self.observers
            .lock()
            .map_err(|_| ChatError::store("registry observer lock poisoned"))?
            .push(observer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dprovider::{ModelVariant, RequestOptions};

    use super::*;
    use crate::{ChatErrorKind, TurnStatus};

    #[derive(Default)]
    struct RecordingObserver {
        changes: Mutex<Vec<(String, RegistryChange)>>,
    }

    impl RegistryObserver for RecordingObserver {
        fn on_change(&self, session_id: &SessionId, change: RegistryChange) {
            self.changes
                .lock()
                .expect("changes lock")
                .push((session_id.to_string(), change));
        }
    }

    fn placeholder() -> Turn {
        Turn::assistant_placeholder("t", "hi", RequestOptions::new(false, ModelVariant::Chat))
    }

    #[test]
    fn append_requires_an_opened_session() {
        let registry = InMemorySessionRegistry::new();
        let err = registry
            .append(&SessionId::from("ghost"), Turn::user("t", "hi", false))
            .expect_err("unopened session must fail");
        assert_eq!(err.kind, ChatErrorKind::UnknownSession);
    }

    #[test]
    fn open_is_idempotent_and_append_returns_indices() {
        let registry = InMemorySessionRegistry::new();
        let session = SessionId::from("s1");

        assert_eq!(registry.open(&session).expect("open"), 0);
        assert_eq!(registry.open(&session).expect("reopen"), 0);

        let first = registry
            .append(&session, Turn::user("t", "hi", false))
            .expect("append user");
        let second = registry.append(&session, placeholder()).expect("append assistant");

        assert_eq!(first.index, 0);
        assert_eq!(second, TurnTarget::new("s1", 1, 0));
        assert_eq!(registry.list_for(&session).expect("list").len(), 2);
    }

    #[test]
    fn update_at_is_silent_for_missing_targets() {
        let registry = InMemorySessionRegistry::new();
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry.append(&session, placeholder()).expect("append");

        let out_of_range = TurnTarget::new("s1", 5, 0);
        let unknown = TurnTarget::new("nope", 0, 0);
        assert!(!registry
            .update_at(&out_of_range, TurnPatch::partial("x"))
            .expect("update"));
        assert!(!registry.update_at(&unknown, TurnPatch::partial("x")).expect("update"));

        let valid = TurnTarget::new("s1", 0, 0);
        assert!(registry.update_at(&valid, TurnPatch::partial("x")).expect("update"));
        assert_eq!(registry.list_for(&session).expect("list")[0].text, "x");
    }

    #[test]
    fn clear_twice_is_equivalent_to_clear_once() {
        let registry = InMemorySessionRegistry::new();
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry.append(&session, placeholder()).expect("append");

        registry.clear(&session).expect("clear");
        assert!(registry.list_for(&session).expect("list").is_empty());
        registry.clear(&session).expect("clear again");
        assert!(registry.list_for(&session).expect("list").is_empty());

        registry
            .clear(&SessionId::from("never-opened"))
            .expect("clearing unknown sessions is a no-op");
        assert_eq!(registry.session_ids().expect("ids"), vec![session]);
    }

    #[test]
    fn stale_generation_cannot_touch_turns_committed_after_clear() {
        let registry = InMemorySessionRegistry::new();
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        let stale = registry.append(&session, placeholder()).expect("append");

        registry.clear(&session).expect("clear");
        let fresh = registry.append(&session, placeholder()).expect("append again");
        assert_eq!(fresh.index, stale.index);
        assert_eq!(fresh.generation, stale.generation + 1);

        assert!(!registry
            .update_at(&stale, TurnPatch::settled("stale answer", None))
            .expect("update"));

        let turns = registry.list_for(&session).expect("list");
        assert_eq!(turns[0].status, TurnStatus::Pending);
        assert!(turns[0].text.is_empty());
    }

    #[test]
    fn observers_see_each_applied_mutation() {
        let registry = InMemorySessionRegistry::new();
        let observer = Arc::new(RecordingObserver::default());
        registry.subscribe(observer.clone()).expect("subscribe");

        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry.open(&session).expect("reopen");
        let target = registry.append(&session, placeholder()).expect("append");
        registry
            .update_at(&target, TurnPatch::settled("done", None))
            .expect("settle");
        registry
            .update_at(&target, TurnPatch::partial("ignored"))
            .expect("late partial");
        registry.clear(&session).expect("clear");

        let changes = observer.changes.lock().expect("changes lock");
        let kinds = changes.iter().map(|(_, change)| *change).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                RegistryChange::Opened,
                RegistryChange::Appended { index: 0 },
                RegistryChange::Updated { index: 0 },
                RegistryChange::Cleared,
            ]
        );
    }

    #[test]
    fn exchange_builds_the_reply_from_turns_before_the_user_turn() {
        let registry = InMemorySessionRegistry::new();
        let observer = Arc::new(RecordingObserver::default());
        registry.subscribe(observer.clone()).expect("subscribe");
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry
            .append(&session, Turn::user("t0", "earlier", false))
            .expect("append");

        let seen = Mutex::new(None);
        let target = registry
            .append_exchange(&session, Turn::user("t1", "next", false), &|prior| {
                *seen.lock().expect("seen lock") = Some(prior.len());
                placeholder()
            })
            .expect("exchange");

        assert_eq!(target, TurnTarget::new("s1", 2, 0));
        assert_eq!(*seen.lock().expect("seen lock"), Some(1));
        let turns = registry.list_for(&session).expect("turns");
        assert!(turns[1].is_inversion);
        assert!(!turns[2].is_inversion);

        let changes = observer.changes.lock().expect("changes lock");
        let tail = changes[changes.len() - 2..]
            .iter()
            .map(|(_, change)| *change)
            .collect::<Vec<_>>();
        assert_eq!(
            tail,
            vec![
                RegistryChange::Appended { index: 1 },
                RegistryChange::Appended { index: 2 },
            ]
        );
    }

    #[test]
    fn exchange_requires_an_opened_session() {
        let registry = InMemorySessionRegistry::new();
        let err = registry
            .append_exchange(
                &SessionId::from("missing"),
                Turn::user("t", "hi", false),
                &|_| placeholder(),
            )
            .expect_err("unknown session");
        assert_eq!(err.kind, ChatErrorKind::UnknownSession);
    }

    #[test]
    fn snapshot_round_trips_through_from_sessions() {
        let registry = InMemorySessionRegistry::new();
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry
            .append(&session, Turn::user("t", "hello", false))
            .expect("append");
        registry.clear(&session).expect("clear");
        registry
            .append(&session, Turn::user("t", "again", false))
            .expect("append");

        let snapshot = registry.snapshot().expect("snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].generation, 1);

        let restored = InMemorySessionRegistry::from_sessions(snapshot.clone());
        assert_eq!(restored.snapshot().expect("snapshot"), snapshot);
        let next = restored.append(&session, placeholder()).expect("append");
        assert_eq!(next, TurnTarget::new("s1", 1, 1));
    }
}
