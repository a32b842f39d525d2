//! Qualitative insight generation from classification aggregates

use crate::engine::classify::Classification;

/// Day gap beyond which a date discrepancy is called out as critical
const CRITICAL_DATE_GAP_DAYS: i64 = 30;

/// How many mismatched invoice numbers an insight names at most
const MISMATCH_SAMPLE: usize = 5;

/// Derive ordered, threshold-triggered observations from a classification
///
/// Pure over its inputs; `filing_rows` is the filing-side row count used
/// as the match-rate denominator (an empty filing set yields rate 0).
pub fn generate_insights(cls: &Classification, filing_rows: usize) -> Vec<String> {
    let mut insights = Vec::new();

    if !cls.partial.is_empty() {
        insights.push(format!(
            "TDS deductions causing ±2% variations in {} invoice(s)",
            cls.partial.len()
        ));
    }

    if !cls.missing_on_ledger_side.is_empty() {
        insights.push(format!(
            "{} invoice(s) filed in GST but missing in AP/AR ledger",
            cls.missing_on_ledger_side.len()
        ));
    }

    if !cls.missing_on_filing_side.is_empty() {
        insights.push(format!(
            "{} invoice(s) in AP/AR but not yet filed in GST",
            cls.missing_on_filing_side.len()
        ));
    }

    if !cls.date_discrepancies.is_empty() {
        insights.push(format!(
            "Found {} invoice(s) with date mismatches between GST and AP/AR",
            cls.date_discrepancies.len()
        ));

        if let Some(worst) = cls
            .date_discrepancies
            .iter()
            .max_by_key(|d| d.difference_days)
        {
            if worst.difference_days > CRITICAL_DATE_GAP_DAYS {
                insights.push(format!(
                    "Critical: invoice {} has {} days date difference",
                    worst.invoice_no, worst.difference_days
                ));
            }
        }
    }

    if !cls.mismatched.is_empty() {
        let sample: Vec<&str> = cls
            .mismatched
            .iter()
            .take(MISMATCH_SAMPLE)
            .map(|m| m.invoice_no.as_str())
            .collect();
        insights.push(format!(
            "Recommended: review invoices {} for amount discrepancies",
            sample.join(", ")
        ));
    }

    let match_rate = if filing_rows > 0 {
        cls.matched.len() as f64 / filing_rows as f64
    } else {
        0.0
    };
    if match_rate > 0.95 {
        insights.push("Excellent reconciliation rate (>95%). Financial data is well-aligned.".to_string());
    } else if match_rate < 0.80 {
        insights.push(
            "Warning: low match rate (<80%). Consider reviewing data entry processes.".to_string(),
        );
    }

    insights
}
