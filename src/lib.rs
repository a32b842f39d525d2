//! # Recon Core
//!
//! An invoice reconciliation library that matches a tax-filing (GST)
//! extract against an accounts-payable/receivable extract, flagging
//! duplicates and date discrepancies along the way.
//!
//! ## Features
//!
//! - **Normalization**: schema validation plus lenient amount/date parsing
//!   that degrades bad cells instead of aborting the batch
//! - **Classification**: exact / partial / mismatched / missing categories
//!   per composite key `(Invoice_No, GSTIN)`, with confidence scores
//! - **Duplicate detection**: repeated keys within a single extract
//! - **Date discrepancies**: day gaps between the two sides' invoice dates
//! - **Insights**: threshold-triggered natural-language observations
//! - **Session handling**: uuid-keyed upload slots behind a storage trait
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_core::{RecordSet, ReconciliationEngine};
//!
//! let filing = RecordSet::from_rows(vec![]).unwrap();
//! let ledger = RecordSet::from_rows(vec![]).unwrap();
//! let report = ReconciliationEngine::new().reconcile(&filing, &ledger);
//! assert_eq!(report.summary.total_invoices, 0);
//! ```

pub mod duplicates;
pub mod engine;
pub mod insights;
pub mod normalize;
pub mod report;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use duplicates::detect_duplicates;
pub use engine::{
    run_reconciliation, MissingPreview, MissingRecordPreview, MissingSideSummary,
    ReconciliationEngine,
};
pub use session::{ReconSession, UploadSummary};
pub use traits::*;
pub use types::*;
