//! Basic reconciliation walkthrough: two small extracts, one report

use recon_core::{
    RawRow, RecordSet, ReconciliationEngine, FIELD_AMOUNT, FIELD_DATE, FIELD_INVOICE_NO,
    FIELD_TAX_ID,
};

fn row(invoice_no: &str, tax_id: &str, amount: &str, date: &str) -> RawRow {
    let mut r = RawRow::new();
    r.insert(FIELD_INVOICE_NO.to_string(), invoice_no.to_string());
    r.insert(FIELD_TAX_ID.to_string(), tax_id.to_string());
    r.insert(FIELD_AMOUNT.to_string(), amount.to_string());
    r.insert(FIELD_DATE.to_string(), date.to_string());
    r
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filing = RecordSet::from_rows(vec![
        row("INV-1001", "27AAPFU0939F1ZV", "10000.00", "2025-01-01"),
        row("INV-1002", "27AAPFU0939F1ZV", "5000.00", "2025-01-02"),
        row("INV-1003", "29AABCU9603R1ZM", "12500.00", "2025-01-03"),
    ])?;

    let ledger = RecordSet::from_rows(vec![
        row("INV-1001", "27AAPFU0939F1ZV", "10000.00", "2025-01-01"),
        row("INV-1002", "27AAPFU0939F1ZV", "5075.00", "2025-01-15"),
        row("INV-2001", "33AAGCC7144L1ZT", "900.00", "2025-01-06"),
    ])?;

    let engine = ReconciliationEngine::new();

    let preview = engine.preview_missing(&filing, &ledger);
    println!(
        "Preview: {} common key(s), {} filed but not in ledger, {} in ledger but not filed",
        preview.common_key_count,
        preview.missing_on_ledger_side.count,
        preview.missing_on_filing_side.count
    );

    let report = engine.reconcile(&filing, &ledger);
    println!(
        "\nSummary: {} exact, {} partial, {} mismatched, match rate {}%",
        report.summary.matched,
        report.summary.partial,
        report.summary.mismatched,
        report.summary.match_rate
    );

    for result in &report.details.partial {
        println!(
            "Partial: {} ({}), confidence {}, off by {:?}",
            result.invoice_no, result.tax_id, result.confidence, result.difference
        );
    }

    println!("\nInsights:");
    for insight in &report.insights {
        println!("  - {insight}");
    }

    Ok(())
}
