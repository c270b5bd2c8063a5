//! First-match-wins resolver shared by the collection-note and past-due
//! fields. These fields rarely have competing layouts as ambiguous as
//! address or balance; the first non-empty candidate in case priority order
//! is the answer.

/// Return the first non-empty, trimmed candidate in case priority order.
pub fn resolve_first_non_empty(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(String::from)
}
