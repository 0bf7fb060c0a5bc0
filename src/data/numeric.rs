use super::table::Table;

/// Coerce one raw cell to a number.
///
/// Surrounding whitespace is ignored. Decimal and scientific notation are
/// accepted; the result must be finite, so `nan` and `inf` are rejected
/// along with empty cells and non-numeric text such as `true`.
pub fn coerce(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric projection of a column: cells that fail [`coerce`] are skipped.
///
/// An absent column yields an empty iterator. The iterator is `Clone`, so
/// the projection can be restarted without touching the table again.
pub fn numeric_column<'a>(table: &'a Table, name: &str) -> impl Iterator<Item = f64> + Clone + 'a {
    table.column(name).into_iter().flatten().filter_map(coerce)
}
