use std::collections::BTreeMap;
use std::fmt;

use super::error::EmptyColumnError;
use super::model::{CategoricalColumn, DeliveryTable, NumericColumn};

// ---------------------------------------------------------------------------
// Summary – descriptive statistics for one numeric column
// ---------------------------------------------------------------------------

/// The usual `describe()` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1). `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let std = self.std.map_or_else(|| "NaN".to_string(), |s| format!("{s:.6}"));
        writeln!(f, "count {:>14}", self.count)?;
        writeln!(f, "mean  {:>14.6}", self.mean)?;
        writeln!(f, "std   {std:>14}")?;
        writeln!(f, "min   {:>14.6}", self.min)?;
        writeln!(f, "25%   {:>14.6}", self.q25)?;
        writeln!(f, "50%   {:>14.6}", self.median)?;
        writeln!(f, "75%   {:>14.6}", self.q75)?;
        writeln!(f, "max   {:>14.6}", self.max)?;
        write!(f, "Name: {}", self.column)
    }
}

/// Descriptive statistics of `column` over every row of `table`.
pub fn describe(table: &DeliveryTable, column: NumericColumn) -> Result<Summary, EmptyColumnError> {
    let mut values = table.values(column);
    if values.is_empty() {
        return Err(EmptyColumnError { column });
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    Ok(Summary {
        column,
        count,
        mean,
        std,
        min: values[0],
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q75: quantile_sorted(&values, 0.75),
        max: values[count - 1],
    })
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean of `value_column` per distinct value of `group_column`.
///
/// Sorted ascending by mean; equal means fall back to key order.
pub fn group_mean(
    table: &DeliveryTable,
    group_column: CategoricalColumn,
    value_column: NumericColumn,
) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in table.records() {
        let entry = sums.entry(record.categorical(group_column)).or_insert((0.0, 0));
        entry.0 += record.numeric(value_column);
        entry.1 += 1;
    }

    let mut means: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(key, (sum, n))| (key.to_string(), sum / n as f64))
        .collect();
    means.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    means
}
