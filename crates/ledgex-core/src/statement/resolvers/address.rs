//! Address resolver.

/// Pick the winning address among competing case candidates.
///
/// Absent candidates are dropped and survivors trimmed. Any candidate that
/// contains the resolved business name as a case-insensitive substring is
/// discarded: loose address patterns frequently capture the name line
/// instead of the street line. With several survivors the shortest wins,
/// since looser patterns over-capture trailing context and the shortest
/// match is the least contaminated. Ties go to the first case in catalog
/// order.
pub fn resolve_address(candidates: &[Option<&str>], business_name: Option<&str>) -> Option<String> {
    let mut valid: Vec<&str> = candidates
        .iter()
        .flatten()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    if let Some(name) = business_name.map(str::trim).filter(|n| !n.is_empty()) {
        let name = name.to_lowercase();
        valid.retain(|a| !a.to_lowercase().contains(&name));
    }

    match valid.len() {
        0 => None,
        1 => Some(valid[0].to_string()),
        // min_by_key keeps the first of equally short survivors.
        _ => valid.into_iter().min_by_key(|a| a.len()).map(String::from),
    }
}
