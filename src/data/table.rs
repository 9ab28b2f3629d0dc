use std::fmt;

// ---------------------------------------------------------------------------
// RawTable – untyped rows straight from the source file
// ---------------------------------------------------------------------------

/// A single cell. `None` means the source had no value (or an NA token).
pub type Cell = Option<String>;

/// Header plus rows of text cells, in file order.
///
/// Every row has exactly `columns.len()` cells; the loaders guarantee this.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        RawTable { columns, rows }
    }

    /// `(rows, columns)`, like a DataFrame shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of missing cells per column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let missing = self
                    .rows
                    .iter()
                    .filter(|row| row.get(idx).map_or(true, Option::is_none))
                    .count();
                (name.clone(), missing)
            })
            .collect()
    }

    /// Per-column non-null count and inferred kind.
    pub fn info(&self) -> Vec<ColumnInfo> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<&str> = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx).and_then(|c| c.as_deref()))
                    .collect();
                ColumnInfo {
                    name: name.clone(),
                    non_null: values.len(),
                    kind: CellKind::infer(&values),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Column info report
// ---------------------------------------------------------------------------

/// Best-effort type of a raw column, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Integer,
    Float,
    Text,
    /// No non-null values to infer from.
    Empty,
}

impl CellKind {
    fn infer(values: &[&str]) -> Self {
        if values.is_empty() {
            return CellKind::Empty;
        }
        if values.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
            return CellKind::Integer;
        }
        if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
            return CellKind::Float;
        }
        CellKind::Text
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellKind::Integer => "int64",
            CellKind::Float => "float64",
            CellKind::Text => "object",
            CellKind::Empty => "empty",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub kind: CellKind,
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} {:>8} non-null  {}", self.name, self.non_null, self.kind)
    }
}
