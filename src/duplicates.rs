//! Duplicate detection within a single extract
//!
//! Duplicates are a warning signal only: classification still proceeds
//! against the last-write-wins index, so nothing is removed here.

use std::collections::HashMap;

use crate::types::*;

/// Scan a record set for composite keys occurring more than once
///
/// Groups are returned in first-occurrence order, each carrying every
/// 0-based source row position. A key seen exactly once never appears.
pub fn detect_duplicates(set: &RecordSet) -> DuplicateCheckResult {
    let mut positions: HashMap<CompositeKey, Vec<usize>> = HashMap::new();
    let mut order: Vec<CompositeKey> = Vec::new();

    for record in &set.records {
        let key = record.key();
        let entry = positions.entry(key.clone()).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(record.row_index);
    }

    let duplicates: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|key| {
            let rows = positions.remove(&key)?;
            if rows.len() > 1 {
                Some(DuplicateGroup {
                    occurrences: rows.len(),
                    rows,
                    key,
                })
            } else {
                None
            }
        })
        .collect();

    DuplicateCheckResult {
        has_duplicates: !duplicates.is_empty(),
        duplicate_count: duplicates.len(),
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(invoice_no: &str, tax_id: &str, row_index: usize) -> InvoiceRecord {
        InvoiceRecord {
            invoice_no: invoice_no.to_string(),
            tax_id: tax_id.to_string(),
            amount: None,
            date: None,
            row_index,
            raw_row: RawRow::new(),
        }
    }

    fn set_of(records: Vec<InvoiceRecord>) -> RecordSet {
        RecordSet {
            records,
            parse_warnings: Vec::new(),
        }
    }

    #[test]
    fn test_no_duplicates() {
        let set = set_of(vec![
            record("INV-001", "G1", 0),
            record("INV-002", "G1", 1),
            record("INV-001", "G2", 2),
        ]);

        let result = detect_duplicates(&set);
        assert!(!result.has_duplicates);
        assert_eq!(result.duplicate_count, 0);
        assert!(result.duplicates.is_empty());
    }

    #[test]
    fn test_repeated_key_forms_one_group() {
        let set = set_of(vec![
            record("INV-001", "G1", 0),
            record("INV-002", "G1", 1),
            record("INV-001", "G1", 2),
            record("INV-001", "G1", 3),
        ]);

        let result = detect_duplicates(&set);
        assert!(result.has_duplicates);
        assert_eq!(result.duplicate_count, 1);
        let group = &result.duplicates[0];
        assert_eq!(group.key, CompositeKey::new("INV-001", "G1"));
        assert_eq!(group.occurrences, 3);
        assert_eq!(group.rows, vec![0, 2, 3]);
    }

    #[test]
    fn test_groups_in_first_occurrence_order() {
        let set = set_of(vec![
            record("INV-002", "G1", 0),
            record("INV-001", "G1", 1),
            record("INV-002", "G1", 2),
            record("INV-001", "G1", 3),
        ]);

        let result = detect_duplicates(&set);
        assert_eq!(result.duplicate_count, 2);
        assert_eq!(result.duplicates[0].key.invoice_no, "INV-002");
        assert_eq!(result.duplicates[1].key.invoice_no, "INV-001");
    }

    #[test]
    fn test_same_invoice_different_gstin_is_not_duplicate() {
        let set = set_of(vec![record("INV-001", "G1", 0), record("INV-001", "G2", 1)]);
        assert!(!detect_duplicates(&set).has_duplicates);
    }
}
