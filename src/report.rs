//! Assembly of the final reconciliation report

use crate::engine::classify::Classification;
use crate::types::*;

/// Exact-match detail entries retained in a report
///
/// Only the exact category is truncated; the other categories are the ones
/// that need review and come back in full.
pub const EXACT_DETAIL_CAP: usize = 100;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Merge classification output, duplicate scans, and insights into a report
///
/// Summary counts are taken before the exact-detail list is capped, so the
/// `matched` count and the `matched` list length can legitimately differ.
pub fn assemble(
    cls: Classification,
    filing_duplicates: DuplicateCheckResult,
    ledger_duplicates: DuplicateCheckResult,
    filing_rows: usize,
    ledger_rows: usize,
    insights: Vec<String>,
) -> ReconciliationReport {
    let match_rate = if filing_rows > 0 {
        round2(cls.matched.len() as f64 / filing_rows as f64 * 100.0)
    } else {
        0.0
    };

    let summary = ReconciliationSummary {
        total_invoices: filing_rows + ledger_rows,
        matched: cls.matched.len(),
        partial: cls.partial.len(),
        mismatched: cls.mismatched.len(),
        missing_on_filing_side: cls.missing_on_filing_side.len(),
        missing_on_ledger_side: cls.missing_on_ledger_side.len(),
        date_discrepancies: cls.date_discrepancies.len(),
        filing_duplicates: filing_duplicates.duplicate_count,
        ledger_duplicates: ledger_duplicates.duplicate_count,
        match_rate,
    };

    let mut matched = cls.matched;
    matched.truncate(EXACT_DETAIL_CAP);

    let details = ReconciliationDetails {
        matched,
        partial: cls.partial,
        mismatched: cls.mismatched,
        missing_on_filing_side: cls.missing_on_filing_side,
        missing_on_ledger_side: cls.missing_on_ledger_side,
        date_discrepancies: cls.date_discrepancies,
        filing_duplicates,
        ledger_duplicates,
    };

    ReconciliationReport {
        summary,
        details,
        insights,
    }
}
