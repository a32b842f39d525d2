//! In-memory session store implementation for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory session store, suitable for tests and single-process services
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, HashMap<LedgerSide, RecordSet>>>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every session (useful for testing)
    pub fn clear(&self) {
        self.sessions.write().unwrap().clear();
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_record_set(
        &mut self,
        session_id: Uuid,
        side: LedgerSide,
        set: RecordSet,
    ) -> ReconResult<()> {
        self.sessions
            .write()
            .unwrap()
            .entry(session_id)
            .or_default()
            .insert(side, set);
        Ok(())
    }

    async fn get_record_set(
        &self,
        session_id: Uuid,
        side: LedgerSide,
    ) -> ReconResult<Option<RecordSet>> {
        Ok(self
            .sessions
            .read()
            .unwrap()
            .get(&session_id)
            .and_then(|slots| slots.get(&side))
            .cloned())
    }

    async fn clear_session(&mut self, session_id: Uuid) -> ReconResult<()> {
        self.sessions.write().unwrap().remove(&session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_set() -> RecordSet {
        RecordSet {
            records: Vec::new(),
            parse_warnings: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_put_get_and_replace() {
        let mut store = MemorySessionStore::new();
        let session = Uuid::new_v4();

        assert!(store
            .get_record_set(session, LedgerSide::Filing)
            .await
            .unwrap()
            .is_none());

        store
            .put_record_set(session, LedgerSide::Filing, empty_set())
            .await
            .unwrap();
        assert!(store
            .get_record_set(session, LedgerSide::Filing)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get_record_set(session, LedgerSide::Ledger)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let mut store = MemorySessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store
            .put_record_set(a, LedgerSide::Filing, empty_set())
            .await
            .unwrap();

        assert!(store
            .get_record_set(b, LedgerSide::Filing)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_clear_session() {
        let mut store = MemorySessionStore::new();
        let session = Uuid::new_v4();

        store
            .put_record_set(session, LedgerSide::Filing, empty_set())
            .await
            .unwrap();
        store.clear_session(session).await.unwrap();

        assert!(store
            .get_record_set(session, LedgerSide::Filing)
            .await
            .unwrap()
            .is_none());
    }
}
