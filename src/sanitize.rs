/// Longest identifier PostgreSQL keeps without truncating.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Rewrites a column label into a SQL-safe identifier.
///
/// Every character outside letters, digits, whitespace, `_` and the Arabic
/// block is replaced with `_`, then the result is cut to
/// [`MAX_IDENTIFIER_LEN`] characters. Distinct labels can map to the same
/// identifier; see `columns::CollisionPolicy`.
pub fn sanitize_column_name(label: &str) -> String {
    label
        .chars()
        .map(|ch| if is_permitted(ch) { ch } else { '_' })
        .take(MAX_IDENTIFIER_LEN)
        .collect()
}

pub fn is_permitted(ch: char) -> bool {
    ch.is_alphanumeric()
        || ch.is_whitespace()
        || ch == '_'
        || ('\u{0600}'..='\u{06FF}').contains(&ch)
}
