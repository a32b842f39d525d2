//! Record normalization: raw tabular rows into validated [`RecordSet`]s
//!
//! Schema validation is dataset-level and fails fast with the full list of
//! missing column names. Per-row amount/date problems never abort the run;
//! they degrade to `None` and are collected as [`ParseWarning`]s.

use crate::types::*;
use crate::utils::parse::{parse_amount, parse_date};

/// Validate that the dataset carries every required column
///
/// A column counts as present when any row carries it, so validation is a
/// property of the dataset rather than of individual rows. An empty
/// dataset is vacuously valid.
pub fn validate_schema(rows: &[RawRow]) -> ReconResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !rows.iter().any(|row| row.contains_key(**field)))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReconError::MissingFields(missing))
    }
}

/// Normalize one raw row into an [`InvoiceRecord`]
///
/// String fields are trimmed; amount and date parse leniently and degrade
/// to `None`, appending a warning per failed field. The raw row is kept
/// intact for echoing back in reports.
fn normalize_row(row: RawRow, row_index: usize, warnings: &mut Vec<ParseWarning>) -> InvoiceRecord {
    let invoice_no = row
        .get(FIELD_INVOICE_NO)
        .map(|v| v.trim().to_string())
        .unwrap_or_default();
    let tax_id = row
        .get(FIELD_TAX_ID)
        .map(|v| v.trim().to_string())
        .unwrap_or_default();

    let amount_raw = row.get(FIELD_AMOUNT).cloned().unwrap_or_default();
    let amount = parse_amount(&amount_raw);
    if amount.is_none() {
        warnings.push(ParseWarning {
            row: row_index,
            field: FIELD_AMOUNT.to_string(),
            value: amount_raw,
        });
    }

    let date_raw = row.get(FIELD_DATE).cloned().unwrap_or_default();
    let date = parse_date(&date_raw);
    if date.is_none() {
        warnings.push(ParseWarning {
            row: row_index,
            field: FIELD_DATE.to_string(),
            value: date_raw,
        });
    }

    InvoiceRecord {
        invoice_no,
        tax_id,
        amount,
        date,
        row_index,
        raw_row: row,
    }
}

impl RecordSet {
    /// Build a validated record set from raw rows
    ///
    /// Fails with [`ReconError::MissingFields`] before touching any row if
    /// required columns are absent at the dataset level.
    pub fn from_rows(rows: Vec<RawRow>) -> ReconResult<Self> {
        validate_schema(&rows)?;

        let mut parse_warnings = Vec::new();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| normalize_row(row, idx, &mut parse_warnings))
            .collect();

        Ok(Self {
            records,
            parse_warnings,
        })
    }
}
