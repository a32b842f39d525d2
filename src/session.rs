//! Session-scoped upload handling
//!
//! A [`ReconSession`] owns the two upload slots a reconciliation run needs,
//! keyed by a session identifier so concurrent tenants never observe each
//! other's extracts. Uploading a side replaces that side's prior set.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::duplicates::detect_duplicates;
use crate::engine::{MissingPreview, ReconciliationEngine};
use crate::traits::SessionStore;
use crate::types::*;

/// What an upload looked like, echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Which slot the extract landed in
    pub side: LedgerSide,
    /// Number of rows accepted
    pub records: usize,
    /// Column names observed across the extract, sorted
    pub fields: Vec<String>,
    /// Sum of all parseable invoice amounts
    pub total_value: BigDecimal,
    /// Rows whose amount or date failed to parse
    pub parse_warnings: Vec<ParseWarning>,
    /// Duplicate scan of the extract
    pub duplicates: DuplicateCheckResult,
    /// Set when the extract contains duplicated keys
    pub warning: Option<String>,
}

/// A reconciliation session: two upload slots plus the engine
pub struct ReconSession<S: SessionStore> {
    id: Uuid,
    store: S,
    engine: ReconciliationEngine,
}

impl<S: SessionStore> ReconSession<S> {
    /// Open a fresh session against the given store
    pub fn new(store: S) -> Self {
        Self::with_id(Uuid::new_v4(), store)
    }

    /// Re-open an existing session by identifier
    pub fn with_id(id: Uuid, store: S) -> Self {
        Self {
            id,
            store,
            engine: ReconciliationEngine::new(),
        }
    }

    /// This session's identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Validate, normalize, and store one side's extract
    ///
    /// Fails with [`ReconError::MissingFields`] before storing anything if
    /// required columns are absent. Replaces any prior upload of the side.
    pub async fn upload(&mut self, side: LedgerSide, rows: Vec<RawRow>) -> ReconResult<UploadSummary> {
        let set = RecordSet::from_rows(rows)?;

        let fields: Vec<String> = set
            .records
            .iter()
            .flat_map(|r| r.raw_row.keys().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let duplicates = detect_duplicates(&set);
        let warning = duplicates.has_duplicates.then(|| {
            format!(
                "Found {} duplicate invoice(s)",
                duplicates.duplicate_count
            )
        });

        let summary = UploadSummary {
            side,
            records: set.len(),
            fields,
            total_value: set.total_value(),
            parse_warnings: set.parse_warnings.clone(),
            duplicates,
            warning,
        };

        self.store.put_record_set(self.id, side, set).await?;
        Ok(summary)
    }

    /// Upload the tax-filing extract
    pub async fn upload_filing(&mut self, rows: Vec<RawRow>) -> ReconResult<UploadSummary> {
        self.upload(LedgerSide::Filing, rows).await
    }

    /// Upload the AP/AR extract
    pub async fn upload_ledger(&mut self, rows: Vec<RawRow>) -> ReconResult<UploadSummary> {
        self.upload(LedgerSide::Ledger, rows).await
    }

    /// Run a full reconciliation over the session's two extracts
    pub async fn reconcile(&self) -> ReconResult<ReconciliationReport> {
        let (filing, ledger) = self.both_sets().await?;
        Ok(self.engine.reconcile(&filing, &ledger))
    }

    /// Preview missing records without running full classification
    pub async fn preview_missing(&self) -> ReconResult<MissingPreview> {
        let (filing, ledger) = self.both_sets().await?;
        Ok(self.engine.preview_missing(&filing, &ledger))
    }

    /// Drop both of the session's extracts
    pub async fn clear(&mut self) -> ReconResult<()> {
        self.store.clear_session(self.id).await
    }

    async fn both_sets(&self) -> ReconResult<(RecordSet, RecordSet)> {
        let filing = self.store.get_record_set(self.id, LedgerSide::Filing).await?;
        let ledger = self.store.get_record_set(self.id, LedgerSide::Ledger).await?;

        match (filing, ledger) {
            (Some(filing), Some(ledger)) => Ok((filing, ledger)),
            (filing, ledger) => {
                let mut missing = Vec::new();
                if filing.is_none() {
                    missing.push(LedgerSide::Filing.to_string());
                }
                if ledger.is_none() {
                    missing.push(LedgerSide::Ledger.to_string());
                }
                Err(ReconError::Precondition(format!(
                    "both extracts must be uploaded first; missing: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}
