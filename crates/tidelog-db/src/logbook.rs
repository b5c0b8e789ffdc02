use tidelog_sessions::{DateKey, Session, SessionDetails, SessionId, SessionStore, StoreError};

use crate::gateway::{GatewayError, PersistenceGateway};

/// What `Logbook::open` found in the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet.
    Empty,
    Loaded { dates: usize, sessions: usize },
    /// The stored blob could not be parsed; starting from an empty store.
    Recovered { reason: String },
}

/// A session store bound to its gateway. Every mutation is saved before it returns.
pub struct Logbook<G: PersistenceGateway> {
    store: SessionStore,
    gateway: G,
}

impl<G: PersistenceGateway> Logbook<G> {
    /// Load the store from `gateway`, falling back to an empty store when the
    /// blob is missing or malformed. Gateway I/O failures are still errors.
    pub fn open(gateway: G) -> Result<(Self, LoadOutcome), GatewayError> {
        let (store, outcome) = match gateway.load()? {
            None => (SessionStore::new(), LoadOutcome::Empty),
            Some(blob) => match SessionStore::from_blob(&blob) {
                Ok(store) => {
                    let outcome = LoadOutcome::Loaded {
                        dates: store.date_count(),
                        sessions: store.session_count(),
                    };
                    (store, outcome)
                }
                Err(e) => {
                    tracing::warn!(
                        location = %gateway.location(),
                        "Stored data is unreadable, starting empty: {}",
                        e
                    );
                    let outcome = LoadOutcome::Recovered {
                        reason: e.to_string(),
                    };
                    (SessionStore::new(), outcome)
                }
            },
        };

        tracing::debug!(location = %gateway.location(), ?outcome, "Opened logbook");
        Ok((Self { store, gateway }, outcome))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Write the whole store through the gateway.
    pub fn save(&self) -> Result<(), GatewayError> {
        let blob = self.store.to_blob()?;
        self.gateway.save(&blob)
    }

    /// Record a new session on `date`.
    pub fn add(&mut self, date: DateKey, details: SessionDetails) -> Result<SessionId, GatewayError> {
        let id = self.store.create(date, details);
        self.save()?;
        tracing::info!(%date, %id, "Added session");
        Ok(id)
    }

    /// Replace the session at storage position `index` on `date`.
    pub fn edit(
        &mut self,
        date: DateKey,
        index: usize,
        details: SessionDetails,
    ) -> Result<Session, GatewayError> {
        let updated = self.store.update(date, index, details)?.clone();
        self.save()?;
        tracing::info!(%date, index, id = %updated.id, "Updated session");
        Ok(updated)
    }

    /// Replace the session with `id` on `date`.
    pub fn edit_by_id(
        &mut self,
        date: DateKey,
        id: &SessionId,
        details: SessionDetails,
    ) -> Result<Session, GatewayError> {
        let index = self.position(date, id)?;
        self.edit(date, index, details)
    }

    /// Delete the session at storage position `index` on `date`.
    pub fn remove(&mut self, date: DateKey, index: usize) -> Result<Session, GatewayError> {
        let removed = self.store.delete(date, index)?;
        self.save()?;
        tracing::info!(%date, index, id = %removed.id, "Deleted session");
        Ok(removed)
    }

    /// Delete the session with `id` on `date`.
    pub fn remove_by_id(&mut self, date: DateKey, id: &SessionId) -> Result<Session, GatewayError> {
        let index = self.position(date, id)?;
        self.remove(date, index)
    }

    fn position(&self, date: DateKey, id: &SessionId) -> Result<usize, GatewayError> {
        self.store.position_of(date, id).ok_or_else(|| {
            GatewayError::Store(StoreError::SessionNotFound {
                date,
                id: id.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    fn details(time: &str, distance: f64) -> SessionDetails {
        SessionDetails {
            time_of_day: time.to_string(),
            wind_speed: 14.0,
            wind_direction: "E".to_string(),
            tide: "Slack".to_string(),
            equipment: "longboard".to_string(),
            distance,
            notes: String::new(),
        }
    }

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_open_empty_gateway() {
        let (logbook, outcome) = Logbook::open(MemoryGateway::new()).unwrap();
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(logbook.store().is_empty());
        assert_eq!(logbook.gateway().save_count(), 0);
    }

    #[test]
    fn test_open_malformed_blob_recovers_without_overwriting() {
        let (logbook, outcome) = Logbook::open(MemoryGateway::with_blob("{oops")).unwrap();
        assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
        assert!(logbook.store().is_empty());
        assert_eq!(logbook.gateway().blob().as_deref(), Some("{oops"));
    }

    #[test]
    fn test_every_mutation_saves() {
        let (mut logbook, _) = Logbook::open(MemoryGateway::new()).unwrap();

        let id = logbook.add(day("2024-05-01"), details("10:00", 2.0)).unwrap();
        assert_eq!(logbook.gateway().save_count(), 1);

        logbook.edit(day("2024-05-01"), 0, details("11:00", 3.0)).unwrap();
        assert_eq!(logbook.gateway().save_count(), 2);

        let removed = logbook.remove_by_id(day("2024-05-01"), &id).unwrap();
        assert_eq!(removed.details.distance, 3.0);
        assert_eq!(logbook.gateway().save_count(), 3);
        assert_eq!(logbook.gateway().blob().as_deref(), Some("{}"));
    }

    #[test]
    fn test_failed_mutation_does_not_save() {
        let (mut logbook, _) = Logbook::open(MemoryGateway::new()).unwrap();

        let err = logbook.remove(day("2024-05-01"), 0).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Store(StoreError::IndexOutOfRange { .. })
        ));
        assert!(logbook
            .edit_by_id(day("2024-05-01"), &SessionId::from("missing"), details("10:00", 1.0))
            .is_err());
        assert_eq!(logbook.gateway().save_count(), 0);
    }

    #[test]
    fn test_reopen_sees_saved_state() {
        let gateway = MemoryGateway::new();
        let (mut logbook, _) = Logbook::open(gateway).unwrap();
        logbook.add(day("2024-05-01"), details("10:00", 2.0)).unwrap();
        let blob = logbook.gateway().blob().unwrap();

        let (reopened, outcome) = Logbook::open(MemoryGateway::with_blob(blob.clone())).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { dates: 1, sessions: 1 });
        assert_eq!(reopened.store(), logbook.store());

        reopened.save().unwrap();
        assert_eq!(reopened.gateway().blob(), Some(blob));
    }
}
