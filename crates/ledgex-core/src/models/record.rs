//! Record data model: fields, per-page records, and the accumulated table.

use serde::{Deserialize, Serialize};

/// A logical field of an extracted statement record.
///
/// The set is closed: every column the engine emits is either one of these
/// fields or a case-qualified diagnostic column of one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Date,
    BusinessName,
    ContactName,
    CustomerNumber,
    PhoneNumber1,
    PhoneNumber2,
    CollectionStatus,
    CollectionNotes,
    Balance,
    PastDue,
    TotalProductSales,
    Address,
    AccountNumber,
}

impl FieldName {
    /// Fields in output column order. Identifying columns come last.
    pub const OUTPUT_ORDER: [FieldName; 13] = [
        FieldName::Date,
        FieldName::BusinessName,
        FieldName::ContactName,
        FieldName::CollectionStatus,
        FieldName::CollectionNotes,
        FieldName::CustomerNumber,
        FieldName::PhoneNumber1,
        FieldName::PhoneNumber2,
        FieldName::Balance,
        FieldName::PastDue,
        FieldName::TotalProductSales,
        FieldName::Address,
        FieldName::AccountNumber,
    ];

    /// Column name of the resolved value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldName::Date => "date",
            FieldName::BusinessName => "business_name",
            FieldName::ContactName => "contact_name",
            FieldName::CustomerNumber => "customer_number",
            FieldName::PhoneNumber1 => "phone_number_1",
            FieldName::PhoneNumber2 => "phone_number_2",
            FieldName::CollectionStatus => "collection_status",
            FieldName::CollectionNotes => "collection_notes",
            FieldName::Balance => "balance",
            FieldName::PastDue => "past_due",
            FieldName::TotalProductSales => "total_product_sales",
            FieldName::Address => "address",
            FieldName::AccountNumber => "account_number",
        }
    }

    /// Number of alternative layout cases this field has in the pattern
    /// catalog. `AccountNumber` is derived, never matched.
    pub const fn case_count(&self) -> u8 {
        match self {
            FieldName::Date
            | FieldName::BusinessName
            | FieldName::ContactName
            | FieldName::CustomerNumber
            | FieldName::PhoneNumber1
            | FieldName::PhoneNumber2 => 1,
            FieldName::CollectionStatus => 4,
            FieldName::CollectionNotes => 3,
            FieldName::Balance => 3,
            FieldName::PastDue => 2,
            FieldName::TotalProductSales => 2,
            FieldName::Address => 10,
            FieldName::AccountNumber => 0,
        }
    }

    /// Whether the field carries per-case diagnostic columns in the full
    /// table (true for every field with competing layout cases).
    pub const fn has_diagnostics(&self) -> bool {
        self.case_count() > 1
    }

    /// Column name of one case's raw diagnostic value.
    pub fn case_column(&self, case_id: u8) -> String {
        format!("{}_case_{}", self.as_str(), case_id)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved, user-facing values of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFields {
    pub date: Option<String>,
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub customer_number: Option<String>,
    pub phone_number_1: Option<String>,
    pub phone_number_2: Option<String>,
    pub collection_status: Option<String>,
    pub collection_notes: Option<String>,
    pub balance: Option<String>,
    pub past_due: Option<String>,
    pub total_product_sales: Option<String>,
    pub address: Option<String>,
    pub account_number: Option<String>,
}

impl ResolvedFields {
    /// Look up a resolved value by field.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        let v = match field {
            FieldName::Date => &self.date,
            FieldName::BusinessName => &self.business_name,
            FieldName::ContactName => &self.contact_name,
            FieldName::CustomerNumber => &self.customer_number,
            FieldName::PhoneNumber1 => &self.phone_number_1,
            FieldName::PhoneNumber2 => &self.phone_number_2,
            FieldName::CollectionStatus => &self.collection_status,
            FieldName::CollectionNotes => &self.collection_notes,
            FieldName::Balance => &self.balance,
            FieldName::PastDue => &self.past_due,
            FieldName::TotalProductSales => &self.total_product_sales,
            FieldName::Address => &self.address,
            FieldName::AccountNumber => &self.account_number,
        };
        v.as_deref()
    }
}

/// One raw candidate kept for diagnostics: what a single catalog case
/// captured on this page, verbatim, before any resolver ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    pub field: FieldName,
    pub case_id: u8,
    pub value: Option<String>,
}

/// One row of output: the resolved values plus every multi-case field's raw
/// candidates. Built once per page and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub resolved: ResolvedFields,
    /// Diagnostic cells in catalog order.
    pub raw: Vec<RawCell>,
}

impl PageRecord {
    /// Rebuild a full record from resolved values alone, with every
    /// diagnostic cell absent. Inverse of the refine projection as far as
    /// resolved columns are concerned.
    pub fn from_resolved(resolved: ResolvedFields) -> Self {
        let mut raw = Vec::new();
        for field in FieldName::OUTPUT_ORDER {
            if field.has_diagnostics() {
                for case_id in 1..=field.case_count() {
                    raw.push(RawCell {
                        field,
                        case_id,
                        value: None,
                    });
                }
            }
        }
        PageRecord { resolved, raw }
    }

    fn raw_value(&self, field: FieldName, case_id: u8) -> Option<&str> {
        self.raw
            .iter()
            .find(|c| c.field == field && c.case_id == case_id)
            .and_then(|c| c.value.as_deref())
    }
}

/// Ordered sequence of per-page records, one per page that yielded text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultTable {
    records: Vec<PageRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PageRecord) {
        self.records.push(record);
    }

    /// Append a flushed chunk, preserving page order.
    pub fn extend(&mut self, chunk: Vec<PageRecord>) {
        self.records.extend(chunk);
    }

    /// Append another document's table, preserving document order.
    pub fn append(&mut self, mut other: ResultTable) {
        self.records.append(&mut other.records);
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full column header: per field, its case diagnostics followed by its
    /// resolved column; identifying columns last by `OUTPUT_ORDER`.
    pub fn header() -> Vec<String> {
        let mut cols = Vec::new();
        for field in FieldName::OUTPUT_ORDER {
            if field.has_diagnostics() {
                for case_id in 1..=field.case_count() {
                    cols.push(field.case_column(case_id));
                }
            }
            cols.push(field.as_str().to_string());
        }
        cols
    }

    /// One record rendered in `header()` order, absent values as "".
    pub fn row(record: &PageRecord) -> Vec<String> {
        let mut cells = Vec::new();
        for field in FieldName::OUTPUT_ORDER {
            if field.has_diagnostics() {
                for case_id in 1..=field.case_count() {
                    cells.push(record.raw_value(field, case_id).unwrap_or("").to_string());
                }
            }
            cells.push(record.resolved.get(field).unwrap_or("").to_string());
        }
        cells
    }

    /// Pure projection to the resolved, user-facing columns.
    pub fn refine(&self) -> RefinedTable {
        RefinedTable {
            records: self.records.iter().map(|r| r.resolved.clone()).collect(),
        }
    }
}

/// The refined view of a table: resolved columns only, diagnostics dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinedTable {
    records: Vec<ResolvedFields>,
}

impl RefinedTable {
    pub fn records(&self) -> &[ResolvedFields] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn header() -> Vec<String> {
        FieldName::OUTPUT_ORDER
            .iter()
            .map(|f| f.as_str().to_string())
            .collect()
    }

    pub fn row(record: &ResolvedFields) -> Vec<String> {
        FieldName::OUTPUT_ORDER
            .iter()
            .map(|f| record.get(*f).unwrap_or("").to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_header_groups_cases_before_resolved() {
        let header = ResultTable::header();

        let balance_case = header.iter().position(|c| c == "balance_case_1").unwrap();
        let balance = header.iter().position(|c| c == "balance").unwrap();
        assert!(balance_case < balance);

        // Identifying column comes last.
        assert_eq!(header.last().unwrap(), "account_number");

        // Single-case fields have no diagnostic columns.
        assert!(!header.iter().any(|c| c.starts_with("date_case")));
        assert!(header.iter().any(|c| c == "address_case_10"));
    }

    #[test]
    fn test_refine_round_trip_preserves_resolved_columns() {
        let mut table = ResultTable::new();
        let mut resolved = ResolvedFields::default();
        resolved.balance = Some("450.00".to_string());
        resolved.customer_number = Some("10023".to_string());
        resolved.account_number = Some("10023".to_string());

        let mut record = PageRecord::from_resolved(resolved);
        record.raw[0].value = Some("PP".to_string());
        table.push(record);

        let refined = table.refine();
        assert_eq!(refined.len(), 1);

        // Re-adding the dropped diagnostic columns as absent reproduces the
        // same resolved-column values.
        let rebuilt = PageRecord::from_resolved(refined.records()[0].clone());
        for field in FieldName::OUTPUT_ORDER {
            assert_eq!(
                rebuilt.resolved.get(field),
                table.records()[0].resolved.get(field)
            );
        }
        assert!(rebuilt.raw.iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn test_row_matches_header_width() {
        let record = PageRecord::from_resolved(ResolvedFields::default());
        assert_eq!(ResultTable::row(&record).len(), ResultTable::header().len());
        assert_eq!(
            RefinedTable::row(&record.resolved).len(),
            RefinedTable::header().len()
        );
    }

    #[test]
    fn test_append_preserves_document_order() {
        let mut first = ResultTable::new();
        let mut a = ResolvedFields::default();
        a.customer_number = Some("1".to_string());
        first.push(PageRecord::from_resolved(a));

        let mut second = ResultTable::new();
        let mut b = ResolvedFields::default();
        b.customer_number = Some("2".to_string());
        second.push(PageRecord::from_resolved(b));

        first.append(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.records()[0].resolved.customer_number.as_deref(), Some("1"));
        assert_eq!(first.records()[1].resolved.customer_number.as_deref(), Some("2"));
    }
}
