//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Required columns shared by both ledger extracts
pub const REQUIRED_FIELDS: [&str; 4] = ["Invoice_No", "GSTIN", "Invoice_Value", "Invoice_Date"];

/// Field name of the invoice number column
pub const FIELD_INVOICE_NO: &str = "Invoice_No";
/// Field name of the business registration (GSTIN) column
pub const FIELD_TAX_ID: &str = "GSTIN";
/// Field name of the invoice amount column
pub const FIELD_AMOUNT: &str = "Invoice_Value";
/// Field name of the invoice date column
pub const FIELD_DATE: &str = "Invoice_Date";

/// A raw tabular row as handed over by the upload/parsing layer
pub type RawRow = HashMap<String, String>;

/// The business key correlating records across the two ledgers
///
/// Both components are case-sensitive and whitespace-trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    /// Invoice number as it appears on the document
    pub invoice_no: String,
    /// GSTIN of the counterparty
    pub tax_id: String,
}

impl CompositeKey {
    /// Create a key, trimming both components
    pub fn new(invoice_no: &str, tax_id: &str) -> Self {
        Self {
            invoice_no: invoice_no.trim().to_string(),
            tax_id: tax_id.trim().to_string(),
        }
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.invoice_no, self.tax_id)
    }
}

/// One normalized row from either ledger
///
/// Amount and date degrade to `None` when the source value does not parse;
/// downstream comparisons treat `None` as incomparable rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Trimmed invoice number
    pub invoice_no: String,
    /// Trimmed GSTIN
    pub tax_id: String,
    /// Parsed invoice amount, `None` if unparsable
    pub amount: Option<BigDecimal>,
    /// Parsed invoice date, `None` if unparsable
    pub date: Option<NaiveDate>,
    /// 0-based position of the row in the source extract
    pub row_index: usize,
    /// Original field name -> original string value, echoed back in reports
    pub raw_row: RawRow,
}

impl InvoiceRecord {
    /// Composite key of this record
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.invoice_no, &self.tax_id)
    }

    /// Date string exactly as it appeared in the source row, for display
    pub fn raw_date(&self) -> Option<&str> {
        self.raw_row.get(FIELD_DATE).map(String::as_str)
    }
}

/// A row whose amount or date failed to parse
///
/// Never fatal; the row is still classified using whichever comparisons
/// remain valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 0-based row position in the source extract
    pub row: usize,
    /// Name of the field that failed to parse
    pub field: String,
    /// The offending source value
    pub value: String,
}

/// An ordered, schema-validated sequence of invoice records from one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Records in source order
    pub records: Vec<InvoiceRecord>,
    /// Per-row amount/date parse failures collected during normalization
    pub parse_warnings: Vec<ParseWarning>,
}

impl RecordSet {
    /// Number of records in the set
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all parseable amounts; unparsable amounts are skipped
    pub fn total_value(&self) -> BigDecimal {
        self.records.iter().filter_map(|r| r.amount.as_ref()).sum()
    }
}

/// Which of the two extracts a record set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerSide {
    /// The tax-filing (GST) extract
    Filing,
    /// The accounts-payable/receivable extract
    Ledger,
}

impl std::fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerSide::Filing => write!(f, "filing"),
            LedgerSide::Ledger => write!(f, "ledger"),
        }
    }
}

/// Match category for one composite key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Amounts agree within the currency-minor-unit tolerance
    Exact,
    /// Amounts differ by no more than the partial-match percentage band
    Partial,
    /// Amounts differ beyond the band, or one amount is unparsable
    Mismatched,
    /// Key present in the filing extract only
    MissingOnLedgerSide,
    /// Key present in the AP/AR extract only
    MissingOnFilingSide,
}

/// Classification outcome for one composite key
///
/// Fixed shape: fields that only apply to some categories are `Option`al
/// rather than conditionally present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Match category
    pub status: MatchStatus,
    /// Invoice number component of the key
    pub invoice_no: String,
    /// GSTIN component of the key
    pub tax_id: String,
    /// Filing-side amount, when the key exists on that side and parses
    pub filing_amount: Option<BigDecimal>,
    /// Ledger-side amount, when the key exists on that side and parses
    pub ledger_amount: Option<BigDecimal>,
    /// Filing-side date string as it appeared in the source
    pub filing_date: Option<String>,
    /// Ledger-side date string as it appeared in the source
    pub ledger_date: Option<String>,
    /// Absolute amount difference, when both amounts parse
    pub difference: Option<BigDecimal>,
    /// Difference as a percentage of the filing amount, rounded to 2 decimals
    pub difference_percent: Option<f64>,
    /// Match quality in [0, 1]; 1.0 = exact, 0.0 = no usable match
    pub confidence: f64,
    /// Absolute day gap between the two dates, when both parse and differ
    pub date_mismatch_days: Option<i64>,
    /// Human-readable explanation of the outcome
    pub reason: Option<String>,
}

/// A composite key occurring more than once within a single extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The repeated key
    pub key: CompositeKey,
    /// How many times the key occurs
    pub occurrences: usize,
    /// 0-based source row positions of every occurrence
    pub rows: Vec<usize>,
}

/// Result of scanning one extract for repeated composite keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    /// Whether any key repeats
    pub has_duplicates: bool,
    /// Number of distinct repeated keys
    pub duplicate_count: usize,
    /// One group per repeated key, in first-occurrence order
    pub duplicates: Vec<DuplicateGroup>,
}

/// A non-zero day gap between the two sides' dates for a paired key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateDiscrepancy {
    /// Invoice number component of the key
    pub invoice_no: String,
    /// GSTIN component of the key
    pub tax_id: String,
    /// Filing-side date string as it appeared in the source
    pub filing_date: Option<String>,
    /// Ledger-side date string as it appeared in the source
    pub ledger_date: Option<String>,
    /// Absolute day gap, always > 0
    pub difference_days: i64,
}

/// Aggregate counts for a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Total rows across both extracts
    pub total_invoices: usize,
    /// Exact matches
    pub matched: usize,
    /// Partial matches
    pub partial: usize,
    /// Mismatches
    pub mismatched: usize,
    /// Keys present only in the AP/AR extract
    pub missing_on_filing_side: usize,
    /// Keys present only in the filing extract
    pub missing_on_ledger_side: usize,
    /// Paired keys whose dates disagree
    pub date_discrepancies: usize,
    /// Distinct duplicated keys in the filing extract
    pub filing_duplicates: usize,
    /// Distinct duplicated keys in the AP/AR extract
    pub ledger_duplicates: usize,
    /// Exact matches as a percentage of filing rows, rounded to 2 decimals;
    /// 0 when the filing extract is empty
    pub match_rate: f64,
}

/// Per-category detail lists for a reconciliation run
///
/// The exact-match list is capped to bound report size; all other
/// categories are returned in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDetails {
    /// Exact matches, first 100 in classification order
    pub matched: Vec<MatchResult>,
    /// Partial matches
    pub partial: Vec<MatchResult>,
    /// Mismatches
    pub mismatched: Vec<MatchResult>,
    /// Keys present only in the AP/AR extract
    pub missing_on_filing_side: Vec<MatchResult>,
    /// Keys present only in the filing extract
    pub missing_on_ledger_side: Vec<MatchResult>,
    /// Paired keys whose dates disagree, in classification order
    pub date_discrepancies: Vec<DateDiscrepancy>,
    /// Duplicate scan of the filing extract
    pub filing_duplicates: DuplicateCheckResult,
    /// Duplicate scan of the AP/AR extract
    pub ledger_duplicates: DuplicateCheckResult,
}

/// Final output of one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Aggregate counts and rates
    pub summary: ReconciliationSummary,
    /// Per-category detail lists
    pub details: ReconciliationDetails,
    /// Threshold-triggered qualitative observations
    pub insights: Vec<String>,
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
