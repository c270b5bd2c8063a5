//! Numeric resolvers: sales totals and balances.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a candidate as a decimal amount after stripping thousands
/// separators. Signed values are accepted.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

/// Pick the sales total among competing case candidates.
///
/// Exactly one parsable candidate wins outright. Among several, the largest
/// value wins: layouts that under-capture truncate the figure, so the larger
/// reading is the more complete one. The winner is rendered as a canonical
/// decimal string with trailing zeros dropped.
pub fn resolve_sales_value(candidates: &[Option<&str>]) -> Option<String> {
    let parsed: Vec<Decimal> = candidates
        .iter()
        .flatten()
        .filter_map(|v| parse_amount(v))
        .collect();

    let best = parsed.into_iter().max()?;
    Some(best.normalize().to_string())
}

/// Pick the balance from the primary and secondary layout candidates.
///
/// The secondary case recognizes the adjustment/negative-balance layout and
/// takes precedence whenever it parses as a signed decimal; otherwise the
/// primary candidate stands, verbatim.
pub fn resolve_balance(primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    if let Some(s) = secondary {
        if parse_amount(s).is_some() {
            return Some(s.to_string());
        }
    }
    primary.map(|p| p.to_string())
}
