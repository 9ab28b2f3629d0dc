use super::table::RawTable;

/// Normalise a freshly loaded table.
///
/// 1. Trim surrounding whitespace from every column name (cells are untouched).
/// 2. Drop every row that has a missing cell.
///
/// Surviving rows keep their relative order. Never fails: a table with no
/// rows left is valid output.
pub fn clean(table: RawTable) -> RawTable {
    let columns: Vec<String> = table.columns.iter().map(|c| c.trim().to_string()).collect();

    for (column, missing) in table.missing_counts() {
        if missing > 0 {
            log::debug!("{:<20} {missing} missing", column.trim());
        }
    }

    let before = table.len();
    let width = columns.len();
    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|row| row.len() == width && row.iter().all(Option::is_some))
        .collect();

    let cleaned = RawTable::new(columns, rows);
    let (rows, cols) = cleaned.shape();
    log::debug!("Dropped {} rows with missing values", before - rows);
    log::info!("Data cleaned. Remaining rows: ({rows}, {cols})");
    cleaned
}
