use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::StoreError;
use crate::types::{Session, SessionDetails, SessionId};

/// Sessions bucketed by calendar day.
///
/// Sessions within a day keep insertion order; sorting happens in the views.
/// A date present in the store always has at least one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionStore {
    days: BTreeMap<DateKey, Vec<Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store from its serialized blob.
    pub fn from_blob(blob: &str) -> Result<Self, StoreError> {
        let mut store: SessionStore = serde_json::from_str(blob)?;
        // Older data may carry empty days; they must not survive loading.
        store.days.retain(|_, sessions| !sessions.is_empty());
        Ok(store)
    }

    /// Serialize the whole store. Output is deterministic for a given store.
    pub fn to_blob(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.days)?)
    }

    /// Append a session to `date`, returning its new id.
    pub fn create(&mut self, date: DateKey, details: SessionDetails) -> SessionId {
        let session = Session::new(details);
        let id = session.id.clone();
        self.days.entry(date).or_default().push(session);
        id
    }

    /// Replace the session stored at `index` on `date`. The slot keeps its id.
    pub fn update(
        &mut self,
        date: DateKey,
        index: usize,
        details: SessionDetails,
    ) -> Result<&Session, StoreError> {
        let slot = self.slot_mut(date, index)?;
        slot.details = details;
        Ok(slot)
    }

    /// Remove the session at `index` on `date`, dropping the date once it is empty.
    pub fn delete(&mut self, date: DateKey, index: usize) -> Result<Session, StoreError> {
        let len = self.sessions_for(date).len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { date, index, len });
        }

        let sessions = self
            .days
            .get_mut(&date)
            .ok_or(StoreError::IndexOutOfRange { date, index, len })?;
        let removed = sessions.remove(index);
        if sessions.is_empty() {
            self.days.remove(&date);
        }
        Ok(removed)
    }

    /// Storage position of the session with `id` on `date`.
    pub fn position_of(&self, date: DateKey, id: &SessionId) -> Option<usize> {
        self.sessions_for(date).iter().position(|s| &s.id == id)
    }

    /// Replace the session with `id` on `date`.
    pub fn update_by_id(
        &mut self,
        date: DateKey,
        id: &SessionId,
        details: SessionDetails,
    ) -> Result<&Session, StoreError> {
        let index = self.require_position(date, id)?;
        self.update(date, index, details)
    }

    /// Remove the session with `id` on `date`.
    pub fn delete_by_id(&mut self, date: DateKey, id: &SessionId) -> Result<Session, StoreError> {
        let index = self.require_position(date, id)?;
        self.delete(date, index)
    }

    /// Sessions for `date` in storage order; empty if the date has none.
    pub fn sessions_for(&self, date: DateKey) -> &[Session] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every stored day with its sessions.
    ///
    /// Callers must not rely on the order of days.
    pub fn entries(&self) -> impl Iterator<Item = (DateKey, &[Session])> {
        self.days
            .iter()
            .map(|(date, sessions)| (*date, sessions.as_slice()))
    }

    /// Number of days with at least one session.
    pub fn date_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of sessions across all days.
    pub fn session_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn slot_mut(&mut self, date: DateKey, index: usize) -> Result<&mut Session, StoreError> {
        let len = self.sessions_for(date).len();
        self.days
            .get_mut(&date)
            .and_then(|sessions| sessions.get_mut(index))
            .ok_or(StoreError::IndexOutOfRange { date, index, len })
    }

    fn require_position(&self, date: DateKey, id: &SessionId) -> Result<usize, StoreError> {
        self.position_of(date, id)
            .ok_or_else(|| StoreError::SessionNotFound {
                date,
                id: id.to_string(),
            })
    }
}
