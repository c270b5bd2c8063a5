//! Rule-based candidate extraction for statement fields.

pub mod catalog;

pub use catalog::{PatternRule, rules, rules_for};

use crate::models::record::FieldName;

/// One case's extraction attempt for one page: either a captured string or
/// absent. Absence is normal; most rules apply to only one layout variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: FieldName,
    pub case_id: u8,
    pub value: Option<String>,
}

/// The sparse candidate set for one page, keyed by (field, case_id) and held
/// in catalog order. Constructed once per page and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    cells: Vec<Candidate>,
}

impl CandidateSet {
    /// Candidate value for one (field, case) pair.
    pub fn get(&self, field: FieldName, case_id: u8) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.field == field && c.case_id == case_id)
            .and_then(|c| c.value.as_deref())
    }

    /// All of a field's case candidates, in case order.
    pub fn cases(&self, field: FieldName) -> Vec<Option<&str>> {
        self.cells
            .iter()
            .filter(|c| c.field == field)
            .map(|c| c.value.as_deref())
            .collect()
    }

    /// The candidate of a single-case field.
    pub fn single(&self, field: FieldName) -> Option<&str> {
        self.get(field, 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.cells.iter()
    }
}

/// Apply every catalog rule to a page's normalized text.
///
/// Each rule gets a single leftmost-match attempt. The scanned input is
/// bounded to `max_scan_len` characters first; several catalog patterns
/// carry greedy wildcard spans, and a degenerate page must not stall the
/// pipeline. `max_scan_len` of 0 means unbounded.
pub fn extract_candidates(text: &str, max_scan_len: usize) -> CandidateSet {
    let scan = bound_scan(text, max_scan_len);
    let cells = catalog::rules()
        .iter()
        .map(|rule| Candidate {
            field: rule.field,
            case_id: rule.case_id,
            value: rule.extract(scan),
        })
        .collect();
    CandidateSet { cells }
}

/// Truncate to a character limit without splitting a code point.
fn bound_scan(text: &str, max_scan_len: usize) -> &str {
    if max_scan_len == 0 {
        return text;
    }
    match text.char_indices().nth(max_scan_len) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "HOUSE LEADS01/15/24 Salesman JD PP 4410 Customer #: 10023 \
        (ACME SUPPLY CO) Phone 1 (312)555-0142 Phone 2 (312)555-0199 \
        Collection Status Total Product Sales JOHN SMITH PP BAD DEBT 1,200.50 \
        450.00 Invoice # 88123 Past Due ACCT #: 320.00 \
        45 Collection Notes 1200 NORTH MAIN RD SPRINGFIELD, IL 62704";

    #[test]
    fn test_extract_produces_one_cell_per_rule() {
        let set = extract_candidates(PAGE, 0);
        assert_eq!(set.iter().count(), catalog::rules().len());
    }

    #[test]
    fn test_extract_single_case_fields() {
        let set = extract_candidates(PAGE, 0);
        assert_eq!(set.single(FieldName::Date), Some("01/15/24"));
        assert_eq!(set.single(FieldName::BusinessName), Some("ACME SUPPLY CO"));
        assert_eq!(set.single(FieldName::CustomerNumber), Some("10023"));
        assert_eq!(set.single(FieldName::PhoneNumber1), Some("(312)555-0199"));
        assert_eq!(set.single(FieldName::PhoneNumber2), Some("(312)555-0199"));
    }

    #[test]
    fn test_extract_competing_cases() {
        let set = extract_candidates(PAGE, 0);

        // The payment-plan marker is visible to three status cases.
        assert_eq!(set.get(FieldName::CollectionStatus, 1), Some("PP"));
        assert_eq!(set.get(FieldName::CollectionStatus, 2), None);
        assert_eq!(set.get(FieldName::CollectionStatus, 4), Some("PP"));

        // Only the bad-debt note case fires on this layout.
        assert_eq!(set.get(FieldName::CollectionNotes, 1), None);
        assert_eq!(set.get(FieldName::CollectionNotes, 2), Some("BAD DEBT"));
        assert_eq!(set.get(FieldName::CollectionNotes, 3), None);

        assert_eq!(set.get(FieldName::Balance, 1), Some("450.00"));
        assert_eq!(set.get(FieldName::Balance, 2), None);
        assert_eq!(set.get(FieldName::PastDue, 1), Some("450.00"));
        assert_eq!(set.get(FieldName::PastDue, 2), Some("320.00"));
        assert_eq!(set.get(FieldName::TotalProductSales, 1), Some("1,200.50"));
        assert_eq!(set.get(FieldName::TotalProductSales, 2), None);
    }

    #[test]
    fn test_extract_address_cases() {
        let set = extract_candidates(PAGE, 0);
        assert_eq!(
            set.get(FieldName::Address, 1),
            Some("1200 NORTH MAIN RD SPRINGFIELD, IL 62704")
        );
        assert_eq!(
            set.get(FieldName::Address, 2),
            Some("1200 NORTH MAIN RD SPRINGFIELD, IL 62704")
        );
        assert_eq!(set.get(FieldName::Address, 9), None);
    }

    #[test]
    fn test_zero_amount_candidate_is_preserved() {
        let set = extract_candidates("Collection Status 0.00 remaining", 0);
        assert_eq!(set.get(FieldName::TotalProductSales, 1), Some("0.00"));
    }

    #[test]
    fn test_scan_bound_hides_late_matches() {
        // The customer number sits past the cap; the date does not.
        let set = extract_candidates(PAGE, 20);
        assert_eq!(set.single(FieldName::Date), Some("01/15/24"));
        assert_eq!(set.single(FieldName::CustomerNumber), None);
    }

    #[test]
    fn test_scan_bound_respects_char_boundaries() {
        let text = "é".repeat(100);
        // Must not panic on a multi-byte boundary.
        let _ = extract_candidates(&text, 50);
    }

    #[test]
    fn test_no_rule_firing_is_normal() {
        let set = extract_candidates("completely unrelated text", 0);
        assert!(set.iter().all(|c| c.value.is_none()));
    }
}
