//! The pattern catalog: every known layout case for every statement field.
//!
//! The catalog is a single explicitly ordered list of rules. It encodes how
//! to *recognize* a value in each layout variant and nothing about which
//! variant wins; picking among competing candidates is entirely the
//! resolvers' job. New layout cases are added here without touching any
//! resolver.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::FieldName;

/// One recognition rule: a single layout case for a logical field.
///
/// Group 1 is the designated capture; every other alternation in the pattern
/// is non-capturing context. `reject_group`, when set, names an auxiliary
/// trailing-context group whose participation discards the match.
#[derive(Debug)]
pub struct PatternRule {
    pub field: FieldName,
    pub case_id: u8,
    pub regex: Regex,
    pub reject_group: Option<usize>,
}

impl PatternRule {
    fn new(field: FieldName, case_id: u8, pattern: &str) -> Self {
        Self {
            field,
            case_id,
            regex: Regex::new(pattern).unwrap(),
            reject_group: None,
        }
    }

    fn with_reject_group(mut self, group: usize) -> Self {
        self.reject_group = Some(group);
        self
    }

    /// Apply this rule to a page's normalized text: single leftmost match,
    /// absent when the designated group did not participate or the reject
    /// group did. A captured "0.00" comes through verbatim like any other
    /// value; zero amounts are values, not absence.
    pub fn extract(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        if let Some(group) = self.reject_group {
            if caps.get(group).is_some() {
                return None;
            }
        }
        Some(caps.get(1)?.as_str().to_string())
    }

    /// Column name this rule's raw candidate is reported under.
    pub fn column(&self) -> String {
        if self.field.has_diagnostics() {
            self.field.case_column(self.case_id)
        } else {
            self.field.as_str().to_string()
        }
    }
}

lazy_static! {
    static ref CATALOG: Vec<PatternRule> = build_catalog();
}

/// The ordered rule list. Order is load-bearing twice over: diagnostic
/// columns appear in this order, and first-match-wins resolvers iterate
/// cases in this order.
pub fn rules() -> &'static [PatternRule] {
    &CATALOG
}

/// Rules for one field, in case order.
pub fn rules_for(field: FieldName) -> impl Iterator<Item = &'static PatternRule> {
    CATALOG.iter().filter(move |r| r.field == field)
}

fn build_catalog() -> Vec<PatternRule> {
    use FieldName::*;

    vec![
        // Batch header date
        PatternRule::new(Date, 1, r"HOUSE LEADS(\d{2}/\d{2}/\d{2})"),
        // Business name, parenthesized after the customer number
        PatternRule::new(BusinessName, 1, r"Customer #:\s\d+\s+\((.*?)\)"),
        // Contact name sits between the sales header and either the payment
        // marker or the first amount
        PatternRule::new(ContactName, 1, r"Total Product Sales(.*?)(?:PP|\d+\.\d{2})"),
        // Collection status: the PP payment-plan marker in its known spots
        PatternRule::new(CollectionStatus, 1, r"Sales\w+ [A-Z]+\s*(PP)?\s*\d"),
        PatternRule::new(CollectionStatus, 2, r"Total Product Sales\s*(PP)?"),
        PatternRule::new(CollectionStatus, 3, r"Sales\w+ [A-Z]+\s*(PP)?\s*\d"),
        PatternRule::new(
            CollectionStatus,
            4,
            r"Collection Status\s+Total Product Sales.*?(\bPP\b|None)",
        ),
        // Collection notes
        PatternRule::new(
            CollectionNotes,
            1,
            r"Collection Status\s+Total Product Sales.*?\bPP\b\s+([A-Z\s]+)\s+\d+\.\d{2}",
        ),
        PatternRule::new(
            CollectionNotes,
            2,
            r"Collection Status\s+Total Product Sales.*?\bPP\b.*?(BAD DEBT)\b",
        ),
        // Agency note, unless it is the label of a negative adjustment row
        PatternRule::new(
            CollectionNotes,
            3,
            r"Collection Status\s+Total Product Sales.*?(CBL/CORI COLLECTING)\b(\s+-\d)?",
        )
        .with_reject_group(2),
        PatternRule::new(CustomerNumber, 1, r"Customer #:\s(\d+)"),
        // Phone numbers: the number printed after the "Phone 2" label, and
        // the second number anywhere on the page
        PatternRule::new(PhoneNumber1, 1, r"Phone 2.*?(\(\d{3}\)\d{3}-\d{4})"),
        PatternRule::new(
            PhoneNumber2,
            1,
            r"\(\d{3}\)\d{3}-\d{4}.*?(\(\d{3}\)\d{3}-\d{4})",
        ),
        // Balance: plain amount before the invoice column, and the
        // adjustment layout where a negative figure is glued to a zero
        PatternRule::new(Balance, 1, r"(\d{1,6}\.\d{2})\s+Invoice #"),
        PatternRule::new(Balance, 2, r"\b0\.00(-\d{1,3}(?:,\d{3})*\.\d{2})\b"),
        PatternRule::new(Balance, 3, r"(-?\d{1,3}(?:,\d{3})*\.\d{2})\s+Invoice #"),
        // Past due
        PatternRule::new(PastDue, 1, r"(\d{1,6}\.\d{2})\s+Invoice #"),
        PatternRule::new(
            PastDue,
            2,
            r"Past\s+Due\s+[A-Z\s/#:]+(\d{1,3}(?:,\d{3})*\.\d{2})",
        ),
        // Total product sales: first comma-grouped amount on the page, and
        // the amount printed directly after the sales header
        PatternRule::new(TotalProductSales, 1, r"(\d{1,3}(?:,\d{3})*\.\d{2})"),
        PatternRule::new(
            TotalProductSales,
            2,
            r"Total Product Sales(?:[A-Z\s]+)?(\d+\.\d{2})",
        ),
        // Addresses, one case per known print layout
        PatternRule::new(
            Address,
            1,
            r"\d+ Collection Notes.*?(\d{1,5}\s[\w\s-]+?\s(?:RD|ST|AVE|LN|DR|BLVD|WAY|CT|PL)\s[\w\s-]+?,\s[A-Z]{2}\s\d{5})",
        ),
        PatternRule::new(
            Address,
            2,
            r"(\d{1,5} [A-Z0-9 ]+ (?:RD|ST|AVE|LN|DR|BLVD|WAY|CT|PL) [A-Z]+, [A-Z]{2} \d{5})",
        ),
        PatternRule::new(Address, 3, r"(\d{1,5} [A-Z0-9]+ [A-Z]+, [A-Z]{2} \d{5})"),
        PatternRule::new(
            Address,
            4,
            r"(\d{3,} [A-Z0-9 ]+ (?:RD|ST|AVE|LN|DR|BLVD|WAY|CT|PL)[A-Z]+, [A-Z]{2} \d{5})",
        ),
        PatternRule::new(
            Address,
            5,
            r"(\d{1,5}\s[\w\s-]+?\s(?:RD|ST|AVE|LN|DR|BLVD|WAY|CT|PL)\s[\w\s-]+?,\s*[A-Z]{2}\s*\d{5})",
        ),
        // Simple format with capitalized street and city names
        PatternRule::new(Address, 6, r"(\d{1,5}\s[A-Z]+\s[A-Z]+,\s[A-Z]{2}\s\d{5})"),
        // No street type
        PatternRule::new(Address, 7, r"(\d{1,5}\s[A-Z0-9]+\s[A-Z]{2},\s\d{5})"),
        // Missing comma before the state
        PatternRule::new(Address, 8, r"(\d{1,5}\s[A-Z0-9]+ [A-Z]+ [A-Z]{2} \d{5})"),
        // PO box
        PatternRule::new(Address, 9, r"(P\.O\. BOX \d{1,5},\s[A-Z]+,\s[A-Z]{2}\s\d{5})"),
        // Same layout as case 1, seen in a second source batch
        PatternRule::new(
            Address,
            10,
            r"\d+ Collection Notes.*?(\d{1,5}\s[\w\s-]+?\s(?:RD|ST|AVE|LN|DR|BLVD|WAY|CT|PL)\s[\w\s-]+?,\s[A-Z]{2}\s\d{5})",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(field: FieldName, case_id: u8) -> &'static PatternRule {
        rules()
            .iter()
            .find(|r| r.field == field && r.case_id == case_id)
            .unwrap()
    }

    #[test]
    fn test_catalog_agrees_with_field_case_counts() {
        for field in FieldName::OUTPUT_ORDER {
            let cases: Vec<u8> = rules_for(field).map(|r| r.case_id).collect();
            let expected: Vec<u8> = (1..=field.case_count()).collect();
            assert_eq!(cases, expected, "field: {}", field);
        }
    }

    #[test]
    fn test_every_rule_has_a_designated_group() {
        for rule in rules() {
            assert!(
                rule.regex.captures_len() >= 2,
                "rule {} has no capture group",
                rule.column()
            );
        }
    }

    #[test]
    fn test_date_rule() {
        let r = rule(FieldName::Date, 1);
        assert_eq!(
            r.extract("HOUSE LEADS01/15/24 Customer #: 10023"),
            Some("01/15/24".to_string())
        );
        assert_eq!(r.extract("no header here"), None);
    }

    #[test]
    fn test_business_name_rule() {
        let r = rule(FieldName::BusinessName, 1);
        assert_eq!(
            r.extract("Customer #: 10023 (ACME SUPPLY CO) Phone 1"),
            Some("ACME SUPPLY CO".to_string())
        );
    }

    #[test]
    fn test_optional_group_absent_when_not_participating() {
        let r = rule(FieldName::CollectionStatus, 2);
        // The pattern matches but the PP group takes no part.
        assert_eq!(r.extract("Total Product Sales 450.00"), None);
        assert_eq!(
            r.extract("Total Product Sales PP"),
            Some("PP".to_string())
        );
    }

    #[test]
    fn test_balance_adjustment_rule() {
        let r = rule(FieldName::Balance, 2);
        assert_eq!(
            r.extract("Collection Status 0.00-1,250.00 Invoice # 90012"),
            Some("-1,250.00".to_string())
        );
    }

    #[test]
    fn test_note_reject_group_discards_adjustment_rows() {
        let r = rule(FieldName::CollectionNotes, 3);
        assert_eq!(
            r.extract("Collection Status Total Product Sales None CBL/CORI COLLECTING 0.00"),
            Some("CBL/CORI COLLECTING".to_string())
        );
        // Followed by a negative figure: the capture is a row label, not a
        // note.
        assert_eq!(
            r.extract("Collection Status Total Product Sales None CBL/CORI COLLECTING -5,000.00"),
            None
        );
    }

    #[test]
    fn test_address_po_box_rule() {
        let r = rule(FieldName::Address, 9);
        assert_eq!(
            r.extract("90012 P.O. BOX 482, DAYTON, OH 45401"),
            Some("P.O. BOX 482, DAYTON, OH 45401".to_string())
        );
    }

    #[test]
    fn test_address_street_rule() {
        let r = rule(FieldName::Address, 2);
        assert_eq!(
            r.extract("Notes 1200 NORTH MAIN RD SPRINGFIELD, IL 62704"),
            Some("1200 NORTH MAIN RD SPRINGFIELD, IL 62704".to_string())
        );
    }

    #[test]
    fn test_zero_amount_is_captured_verbatim() {
        let r = rule(FieldName::TotalProductSales, 1);
        assert_eq!(r.extract("balance 0.00 due"), Some("0.00".to_string()));
    }
}
