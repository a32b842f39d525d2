//! Reconciliation engine: indexing, classification, and reporting
//!
//! One run is synchronous and CPU-bound: both record sets are indexed,
//! every composite key is classified, insights derived, and the report
//! assembled, with no suspension points in between.

pub mod classify;
pub mod index;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::duplicates::detect_duplicates;
use crate::insights::generate_insights;
use crate::report;
use crate::types::*;
use index::KeyIndex;

/// Missing-record previews shown per side before a full run
const PREVIEW_RECORD_LIMIT: usize = 10;

/// A record surfaced by the missing-records preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingRecordPreview {
    /// Invoice number component of the key
    pub invoice_no: String,
    /// GSTIN component of the key
    pub tax_id: String,
    /// Invoice amount, when it parses
    pub amount: Option<BigDecimal>,
    /// Invoice date string as it appeared in the source
    pub date: Option<String>,
}

/// One side's share of the missing-records preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSideSummary {
    /// Keys present only on the other side
    pub count: usize,
    /// Sum of parseable amounts across all missing records
    pub total_value: BigDecimal,
    /// First few missing records, in key discovery order
    pub records: Vec<MissingRecordPreview>,
}

/// Key-set-only comparison of the two extracts
///
/// Cheaper than a full run: no amount or date classification happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPreview {
    /// Keys filed but absent from the AP/AR ledger
    pub missing_on_ledger_side: MissingSideSummary,
    /// Keys in the AP/AR ledger but not filed
    pub missing_on_filing_side: MissingSideSummary,
    /// Keys present on both sides
    pub common_key_count: usize,
    /// Distinct keys in the filing extract
    pub total_filing_keys: usize,
    /// Distinct keys in the AP/AR extract
    pub total_ledger_keys: usize,
}

/// The reconciliation engine
///
/// Stateless; both record sets are borrowed for the duration of a run and
/// never mutated.
#[derive(Debug, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Run a full reconciliation of the filing extract against the ledger
    /// extract
    pub fn reconcile(&self, filing: &RecordSet, ledger: &RecordSet) -> ReconciliationReport {
        let filing_idx = KeyIndex::build(filing);
        let ledger_idx = KeyIndex::build(ledger);

        let classification = classify::classify(&filing_idx, &ledger_idx);
        let insights = generate_insights(&classification, filing.len());

        report::assemble(
            classification,
            detect_duplicates(filing),
            detect_duplicates(ledger),
            filing.len(),
            ledger.len(),
            insights,
        )
    }

    /// Compare key sets only, previewing what a full run would report
    /// missing on each side
    pub fn preview_missing(&self, filing: &RecordSet, ledger: &RecordSet) -> MissingPreview {
        let filing_idx = KeyIndex::build(filing);
        let ledger_idx = KeyIndex::build(ledger);

        let missing_on_ledger_side = side_summary(&filing_idx, &ledger_idx);
        let missing_on_filing_side = side_summary(&ledger_idx, &filing_idx);

        let common_key_count = filing_idx
            .keys()
            .filter(|key| ledger_idx.contains(key))
            .count();

        MissingPreview {
            missing_on_ledger_side,
            missing_on_filing_side,
            common_key_count,
            total_filing_keys: filing_idx.len(),
            total_ledger_keys: ledger_idx.len(),
        }
    }
}

/// Validate and reconcile two raw extracts in one call
///
/// Schema validation failures on either side surface as
/// [`ReconError::MissingFields`] before any classification runs.
pub fn run_reconciliation(
    filing_rows: Vec<RawRow>,
    ledger_rows: Vec<RawRow>,
) -> ReconResult<ReconciliationReport> {
    let filing = RecordSet::from_rows(filing_rows)?;
    let ledger = RecordSet::from_rows(ledger_rows)?;
    Ok(ReconciliationEngine::new().reconcile(&filing, &ledger))
}

/// Summarize keys of `own` absent from `other`
fn side_summary(own: &KeyIndex<'_>, other: &KeyIndex<'_>) -> MissingSideSummary {
    let mut count = 0;
    let mut total_value = BigDecimal::from(0);
    let mut records = Vec::new();

    for key in own.keys() {
        if other.contains(key) {
            continue;
        }
        let record = match own.get(key) {
            Some(rec) => rec,
            None => continue,
        };

        count += 1;
        if let Some(amount) = &record.amount {
            total_value += amount;
        }
        if records.len() < PREVIEW_RECORD_LIMIT {
            records.push(MissingRecordPreview {
                invoice_no: key.invoice_no.clone(),
                tax_id: key.tax_id.clone(),
                amount: record.amount.clone(),
                date: record.raw_date().map(str::to_string),
            });
        }
    }

    MissingSideSummary {
        count,
        total_value,
        records,
    }
}
