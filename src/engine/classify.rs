//! Match classification between the filing-side and ledger-side indexes

use bigdecimal::{BigDecimal, ToPrimitive, Zero};

use crate::engine::index::KeyIndex;
use crate::types::*;

/// Amounts closer than one currency minor unit count as exact
fn amount_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Relative difference band (percent) still accepted as a partial match
const PARTIAL_THRESHOLD_PCT: u32 = 2;

/// Classification output, grouped by category in classification order
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub matched: Vec<MatchResult>,
    pub partial: Vec<MatchResult>,
    pub mismatched: Vec<MatchResult>,
    pub missing_on_filing_side: Vec<MatchResult>,
    pub missing_on_ledger_side: Vec<MatchResult>,
    pub date_discrepancies: Vec<DateDiscrepancy>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Absolute day gap between the two sides' dates, when both parse and differ
fn date_gap(filing: &InvoiceRecord, ledger: &InvoiceRecord) -> Option<i64> {
    let gap = (filing.date? - ledger.date?).num_days().abs();
    (gap > 0).then_some(gap)
}

/// Classify one key present on both sides
fn classify_pair(key: &CompositeKey, filing: &InvoiceRecord, ledger: &InvoiceRecord) -> MatchResult {
    let mut result = MatchResult {
        status: MatchStatus::Mismatched,
        invoice_no: key.invoice_no.clone(),
        tax_id: key.tax_id.clone(),
        filing_amount: filing.amount.clone(),
        ledger_amount: ledger.amount.clone(),
        filing_date: filing.raw_date().map(str::to_string),
        ledger_date: ledger.raw_date().map(str::to_string),
        difference: None,
        difference_percent: None,
        confidence: 0.0,
        date_mismatch_days: date_gap(filing, ledger),
        reason: None,
    };

    let (a, b) = match (&filing.amount, &ledger.amount) {
        (Some(a), Some(b)) => (a, b),
        (None, _) => {
            result.reason = Some("Filing amount is unparsable".to_string());
            return result;
        }
        (_, None) => {
            result.reason = Some("Ledger amount is unparsable".to_string());
            return result;
        }
    };

    let diff = (a - b).abs();

    if diff < amount_tolerance() {
        result.status = MatchStatus::Exact;
        result.confidence = 1.0;
        result.difference = Some(BigDecimal::zero());
        return result;
    }

    if a.is_zero() {
        // cannot express a relative difference against a zero filing amount
        result.difference = Some(diff);
        result.reason = Some("Filing amount is zero; amounts differ".to_string());
        return result;
    }

    // diff/|a|*100 <= threshold, compared multiplicatively to stay exact
    let within_band =
        &diff * BigDecimal::from(100) <= a.abs() * BigDecimal::from(PARTIAL_THRESHOLD_PCT);
    let pct = (&diff * BigDecimal::from(100) / a.abs())
        .to_f64()
        .unwrap_or(f64::MAX);

    result.difference = Some(diff);
    result.difference_percent = Some(round2(pct));

    if within_band {
        result.status = MatchStatus::Partial;
        result.confidence = round2(1.0 - pct / 100.0);
        result.reason = Some(format!(
            "Amount within ±{PARTIAL_THRESHOLD_PCT}% threshold"
        ));
    } else {
        result.reason = Some(format!("Amount differs by {pct:.2}%"));
    }

    result
}

/// Build a missing-on-one-side result from the record that does exist
fn missing_result(key: &CompositeKey, record: &InvoiceRecord, side: LedgerSide) -> MatchResult {
    let (status, reason) = match side {
        LedgerSide::Filing => (
            MatchStatus::MissingOnLedgerSide,
            "Invoice present in filing extract but absent from AP/AR ledger",
        ),
        LedgerSide::Ledger => (
            MatchStatus::MissingOnFilingSide,
            "Invoice present in AP/AR ledger but not filed",
        ),
    };

    let (filing_amount, ledger_amount, filing_date, ledger_date) = match side {
        LedgerSide::Filing => (
            record.amount.clone(),
            None,
            record.raw_date().map(str::to_string),
            None,
        ),
        LedgerSide::Ledger => (
            None,
            record.amount.clone(),
            None,
            record.raw_date().map(str::to_string),
        ),
    };

    MatchResult {
        status,
        invoice_no: key.invoice_no.clone(),
        tax_id: key.tax_id.clone(),
        filing_amount,
        ledger_amount,
        filing_date,
        ledger_date,
        difference: None,
        difference_percent: None,
        confidence: 0.0,
        date_mismatch_days: None,
        reason: Some(reason.to_string()),
    }
}

/// Classify every key across the two indexes
///
/// The filing index drives the pass: each of its keys lands in exactly one
/// category. Ledger-only keys are enumerated afterwards. Iteration follows
/// the indexes' first-seen key order, so output is deterministic for fixed
/// inputs beyond the documented last-write-wins tie-break.
pub fn classify(filing: &KeyIndex<'_>, ledger: &KeyIndex<'_>) -> Classification {
    let mut out = Classification::default();

    for key in filing.keys() {
        let filing_rec = match filing.get(key) {
            Some(rec) => rec,
            None => continue,
        };

        let ledger_rec = match ledger.get(key) {
            Some(rec) => rec,
            None => {
                out.missing_on_ledger_side
                    .push(missing_result(key, filing_rec, LedgerSide::Filing));
                continue;
            }
        };

        let result = classify_pair(key, filing_rec, ledger_rec);

        if let Some(days) = result.date_mismatch_days {
            out.date_discrepancies.push(DateDiscrepancy {
                invoice_no: key.invoice_no.clone(),
                tax_id: key.tax_id.clone(),
                filing_date: result.filing_date.clone(),
                ledger_date: result.ledger_date.clone(),
                difference_days: days,
            });
        }

        match result.status {
            MatchStatus::Exact => out.matched.push(result),
            MatchStatus::Partial => out.partial.push(result),
            _ => out.mismatched.push(result),
        }
    }

    for key in ledger.keys() {
        if !filing.contains(key) {
            if let Some(ledger_rec) = ledger.get(key) {
                out.missing_on_filing_side
                    .push(missing_result(key, ledger_rec, LedgerSide::Ledger));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(invoice_no: &str, amount: &str, date: &str, row_index: usize) -> InvoiceRecord {
        let mut raw_row = RawRow::new();
        raw_row.insert(FIELD_DATE.to_string(), date.to_string());
        InvoiceRecord {
            invoice_no: invoice_no.to_string(),
            tax_id: "27AAPFU0939F1ZV".to_string(),
            amount: BigDecimal::from_str(amount).ok(),
            date: crate::utils::parse::parse_date(date),
            row_index,
            raw_row,
        }
    }

    fn set_of(records: Vec<InvoiceRecord>) -> RecordSet {
        RecordSet {
            records,
            parse_warnings: Vec::new(),
        }
    }

    fn run(filing: Vec<InvoiceRecord>, ledger: Vec<InvoiceRecord>) -> Classification {
        let filing_set = set_of(filing);
        let ledger_set = set_of(ledger);
        let filing_idx = KeyIndex::build(&filing_set);
        let ledger_idx = KeyIndex::build(&ledger_set);
        classify(&filing_idx, &ledger_idx)
    }

    #[test]
    fn test_identical_amounts_are_exact() {
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.matched.len(), 1);
        let m = &cls.matched[0];
        assert_eq!(m.status, MatchStatus::Exact);
        assert_eq!(m.confidence, 1.0);
        assert_eq!(m.difference, Some(BigDecimal::zero()));
        assert_eq!(m.date_mismatch_days, None);
        assert!(cls.date_discrepancies.is_empty());
    }

    #[test]
    fn test_sub_minor_unit_difference_is_exact() {
        let cls = run(
            vec![record("INV-001", "100.000", "2025-01-01", 0)],
            vec![record("INV-001", "100.005", "2025-01-01", 0)],
        );
        assert_eq!(cls.matched.len(), 1);
        assert_eq!(cls.matched[0].confidence, 1.0);
    }

    #[test]
    fn test_small_difference_is_partial_with_scaled_confidence() {
        // 1.5% apart: confidence = round(1 - 1.5/100, 2) = 0.99
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "10150.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.partial.len(), 1);
        let p = &cls.partial[0];
        assert_eq!(p.status, MatchStatus::Partial);
        assert_eq!(p.confidence, 0.99);
        assert_eq!(p.difference, BigDecimal::from_str("150.00").ok());
        assert_eq!(p.difference_percent, Some(1.5));
    }

    #[test]
    fn test_band_edge_two_percent_is_partial() {
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "10200.00", "2025-01-01", 0)],
        );
        assert_eq!(cls.partial.len(), 1);
        assert_eq!(cls.partial[0].confidence, 0.98);
    }

    #[test]
    fn test_large_difference_is_mismatched() {
        // 5% apart
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "10500.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.mismatched.len(), 1);
        let m = &cls.mismatched[0];
        assert_eq!(m.status, MatchStatus::Mismatched);
        assert_eq!(m.confidence, 0.0);
        assert_eq!(m.difference_percent, Some(5.0));
        assert_eq!(m.reason.as_deref(), Some("Amount differs by 5.00%"));
    }

    #[test]
    fn test_unparsable_amount_is_mismatched_not_a_crash() {
        let cls = run(
            vec![record("INV-001", "not-a-number", "2025-01-01", 0)],
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.mismatched.len(), 1);
        let m = &cls.mismatched[0];
        assert_eq!(m.confidence, 0.0);
        assert_eq!(m.filing_amount, None);
        assert_eq!(m.difference, None);
        assert_eq!(m.reason.as_deref(), Some("Filing amount is unparsable"));
    }

    #[test]
    fn test_zero_filing_amount_avoids_division() {
        let cls = run(
            vec![record("INV-001", "0", "2025-01-01", 0)],
            vec![record("INV-001", "500", "2025-01-01", 0)],
        );

        assert_eq!(cls.mismatched.len(), 1);
        assert_eq!(cls.mismatched[0].confidence, 0.0);
        assert_eq!(cls.mismatched[0].difference_percent, None);
    }

    #[test]
    fn test_filing_only_key_is_missing_on_ledger_side() {
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-999", "10000.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.missing_on_ledger_side.len(), 1);
        let m = &cls.missing_on_ledger_side[0];
        assert_eq!(m.status, MatchStatus::MissingOnLedgerSide);
        assert_eq!(m.confidence, 0.0);
        assert!(m.filing_amount.is_some());
        assert!(m.ledger_amount.is_none());

        assert_eq!(cls.missing_on_filing_side.len(), 1);
        assert_eq!(
            cls.missing_on_filing_side[0].status,
            MatchStatus::MissingOnFilingSide
        );
    }

    #[test]
    fn test_date_gap_attaches_regardless_of_amount_category() {
        // exact amounts, 14 days apart
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "10000.00", "2025-01-15", 0)],
        );

        assert_eq!(cls.matched.len(), 1);
        assert_eq!(cls.matched[0].date_mismatch_days, Some(14));
        assert_eq!(cls.date_discrepancies.len(), 1);
        assert_eq!(cls.date_discrepancies[0].difference_days, 14);

        // mismatched amounts also carry the gap
        let cls = run(
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
            vec![record("INV-001", "20000.00", "2025-02-01", 0)],
        );
        assert_eq!(cls.mismatched[0].date_mismatch_days, Some(31));
        assert_eq!(cls.date_discrepancies.len(), 1);
    }

    #[test]
    fn test_same_dates_attach_no_discrepancy() {
        let cls = run(
            vec![record("INV-001", "100", "2025-01-01", 0)],
            vec![record("INV-001", "100", "01/01/2025", 0)],
        );
        assert_eq!(cls.matched[0].date_mismatch_days, None);
        assert!(cls.date_discrepancies.is_empty());
    }

    #[test]
    fn test_unparsable_date_is_incomparable() {
        let cls = run(
            vec![record("INV-001", "100", "garbled", 0)],
            vec![record("INV-001", "100", "2025-01-15", 0)],
        );
        assert_eq!(cls.matched[0].date_mismatch_days, None);
        assert!(cls.date_discrepancies.is_empty());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let filing = vec![
            record("INV-001", "10000.00", "2025-01-01", 0),
            record("INV-002", "5000.00", "2025-01-02", 1),
            record("INV-003", "bad", "2025-01-03", 2),
        ];
        let ledger = vec![
            record("INV-001", "10100.00", "2025-01-05", 0),
            record("INV-004", "750.00", "2025-01-04", 1),
        ];

        let first = run(filing.clone(), ledger.clone());
        let second = run(filing, ledger);

        assert_eq!(first.matched, second.matched);
        assert_eq!(first.partial, second.partial);
        assert_eq!(first.mismatched, second.mismatched);
        assert_eq!(first.missing_on_filing_side, second.missing_on_filing_side);
        assert_eq!(first.missing_on_ledger_side, second.missing_on_ledger_side);
        assert_eq!(first.date_discrepancies, second.date_discrepancies);
    }

    #[test]
    fn test_duplicate_filing_key_classified_once_by_last_row() {
        let cls = run(
            vec![
                record("INV-001", "9999.00", "2025-01-01", 0),
                record("INV-001", "10000.00", "2025-01-01", 1),
            ],
            vec![record("INV-001", "10000.00", "2025-01-01", 0)],
        );

        assert_eq!(cls.matched.len(), 1);
        assert!(cls.partial.is_empty());
        assert!(cls.mismatched.is_empty());
    }
}
