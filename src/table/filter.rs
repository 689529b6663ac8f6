//! Search filtering

use super::{Row, display_value, is_scalar};

/// Normalized search needle: trimmed and lower-cased.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Whether any scalar field of `row` contains `needle`.
///
/// `needle` must already be normalized with [`normalize_term`].
pub fn row_matches(row: &Row, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    row.iter()
        .filter(|(_, value)| is_scalar(value))
        .any(|(_, value)| display_value(value).to_lowercase().contains(needle))
}

/// Keep the rows matching `term`, preserving their order.
pub fn filter_rows<'a, I>(rows: I, term: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let needle = normalize_term(term);
    rows.into_iter()
        .filter(|row| row_matches(row, &needle))
        .collect()
}
