//! Traits for session storage abstraction
//!
//! A reconciliation run needs both record sets resident at classification
//! time. Where they live between uploads is a storage concern, abstracted
//! here so any backend (in-memory, Redis, a database) can hold them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;

/// Storage for the per-session upload slots
///
/// Each session holds at most one record set per [`LedgerSide`]; a later
/// upload of the same side replaces the prior set.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a record set for one side of a session, replacing any prior set
    async fn put_record_set(
        &mut self,
        session_id: Uuid,
        side: LedgerSide,
        set: RecordSet,
    ) -> ReconResult<()>;

    /// Fetch the record set for one side of a session, if uploaded
    async fn get_record_set(
        &self,
        session_id: Uuid,
        side: LedgerSide,
    ) -> ReconResult<Option<RecordSet>>;

    /// Drop both of a session's record sets
    async fn clear_session(&mut self, session_id: Uuid) -> ReconResult<()>;
}
