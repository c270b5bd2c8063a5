//! Per-page record extraction: normalize, run the catalog, resolve fields.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::record::{FieldName, PageRecord, RawCell, ResolvedFields};

use super::normalize::normalize;
use super::resolvers::{
    resolve_address, resolve_balance, resolve_first_non_empty, resolve_sales_value,
};
use super::rules::{CandidateSet, extract_candidates};

/// Turns one page of raw statement text into a [`PageRecord`].
///
/// Stateless apart from its configuration; every page is extracted and
/// resolved in isolation.
pub struct RecordExtractor {
    max_scan_len: usize,
}

impl RecordExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            max_scan_len: ExtractionConfig::default().max_scan_len,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_scan_len: config.max_scan_len,
        }
    }

    /// Set the per-page pattern-matching input bound (0 = unbounded).
    pub fn with_max_scan_len(mut self, max_scan_len: usize) -> Self {
        self.max_scan_len = max_scan_len;
        self
    }

    /// Extract one page. Never fails; a page nothing matches on yields a
    /// record of absent values.
    pub fn extract_page(&self, raw_text: &str) -> PageRecord {
        let text = normalize(raw_text);
        let candidates = extract_candidates(&text, self.max_scan_len);
        let resolved = self.resolve(&candidates);

        debug!(
            matched = candidates.iter().filter(|c| c.value.is_some()).count(),
            "extracted page record"
        );

        PageRecord {
            raw: diagnostic_cells(&candidates),
            resolved,
        }
    }

    fn resolve(&self, candidates: &CandidateSet) -> ResolvedFields {
        let mut resolved = ResolvedFields::default();

        // Single-case fields pass through as captured.
        resolved.date = owned(candidates.single(FieldName::Date));
        resolved.business_name = owned(candidates.single(FieldName::BusinessName));
        resolved.contact_name = owned(candidates.single(FieldName::ContactName));
        resolved.customer_number = owned(candidates.single(FieldName::CustomerNumber));
        resolved.phone_number_1 = owned(candidates.single(FieldName::PhoneNumber1));
        resolved.phone_number_2 = owned(candidates.single(FieldName::PhoneNumber2));

        // The labeled-status layout is authoritative for collection status.
        resolved.collection_status =
            resolve_first_non_empty(&[candidates.get(FieldName::CollectionStatus, 4)]);

        resolved.collection_notes =
            resolve_first_non_empty(&candidates.cases(FieldName::CollectionNotes));
        resolved.past_due = resolve_first_non_empty(&candidates.cases(FieldName::PastDue));

        resolved.total_product_sales =
            resolve_sales_value(&candidates.cases(FieldName::TotalProductSales));
        resolved.balance = resolve_balance(
            candidates.get(FieldName::Balance, 1),
            candidates.get(FieldName::Balance, 2),
        );

        // The address resolver needs the business name to weed out
        // name-line mis-captures.
        resolved.address = resolve_address(
            &candidates.cases(FieldName::Address),
            resolved.business_name.as_deref(),
        );

        resolved.account_number = resolved.customer_number.clone();

        resolved
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(String::from)
}

/// Every multi-case field's raw candidates, in catalog order.
fn diagnostic_cells(candidates: &CandidateSet) -> Vec<RawCell> {
    candidates
        .iter()
        .filter(|c| c.field.has_diagnostics())
        .map(|c| RawCell {
            field: c.field,
            case_id: c.case_id,
            value: c.value.clone(),
        })
        .collect()
}
