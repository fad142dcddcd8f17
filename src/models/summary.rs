use crate::models::table::{Column, ColumnKind, DataTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl NumericStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let variance = values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            count,
            mean,
            std_dev,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear-interpolated quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;

    if lower + 1 < sorted.len() {
        sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[lower]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value and its frequency; ties resolve to the value seen
    /// first in row order.
    pub top: Option<(String, usize)>,
}

impl CategoricalStats {
    pub fn from_column(column: &Column) -> Self {
        let mut frequencies: HashMap<&str, (usize, usize)> = HashMap::new();

        for (row, cell) in column.cells.iter().enumerate() {
            if let Some(value) = cell {
                let entry = frequencies.entry(value.as_str()).or_insert((0, row));
                entry.0 += 1;
            }
        }

        let top = frequencies
            .iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(value, &(freq, _))| (value.to_string(), freq));

        Self {
            count: column.present_count(),
            unique: frequencies.len(),
            top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub numeric: Option<NumericStats>,
    pub categorical: Option<CategoricalStats>,
}

/// Descriptive statistics for an entire dataset, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn describe(table: &DataTable) -> Self {
        let columns = table
            .columns
            .iter()
            .map(|column| {
                let (numeric, categorical) = match column.kind {
                    ColumnKind::Numeric => (NumericStats::from_values(&column.numbers()), None),
                    ColumnKind::Categorical => (None, Some(CategoricalStats::from_column(column))),
                };
                ColumnSummary {
                    name: column.name.clone(),
                    kind: column.kind,
                    missing: column.missing_count(),
                    numeric,
                    categorical,
                }
            })
            .collect();

        Self {
            row_count: table.row_count(),
            columns,
        }
    }

    /// Plain-text rendering used in the analysis prompt.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for column in &self.columns {
            if let Some(stats) = &column.numeric {
                let _ = writeln!(
                    out,
                    "{}: count={} mean={:.4} std={:.4} min={:.4} 25%={:.4} 50%={:.4} 75%={:.4} max={:.4}",
                    column.name,
                    stats.count,
                    stats.mean,
                    stats.std_dev,
                    stats.min,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.max,
                );
            } else if let Some(stats) = &column.categorical {
                match &stats.top {
                    Some((value, freq)) => {
                        let _ = writeln!(
                            out,
                            "{}: count={} unique={} top=\"{}\" freq={}",
                            column.name, stats.count, stats.unique, value, freq,
                        );
                    }
                    None => {
                        let _ = writeln!(
                            out,
                            "{}: count={} unique={}",
                            column.name, stats.count, stats.unique,
                        );
                    }
                }
            }
        }

        out
    }

    /// Per-column missing-value counts, one line per column.
    pub fn missing_values_text(&self) -> String {
        let mut out = String::new();
        for column in &self.columns {
            let _ = writeln!(out, "{}: {}", column.name, column.missing);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_numeric_stats() {
        let stats = NumericStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-9);
        assert!((stats.std_dev - 1.2909944487).abs() < 1e-6);
        assert!((stats.q1 - 1.75).abs() < 1e-9);
        assert!((stats.median - 2.5).abs() < 1e-9);
        assert!((stats.q3 - 3.25).abs() < 1e-9);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_single_value_stats() {
        let stats = NumericStats::from_values(&[7.0]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.median, 7.0);
    }

    #[test]
    fn test_empty_values_give_no_stats() {
        assert!(NumericStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_categorical_stats_top_and_ties() {
        let column = Column::classify(
            "city".to_string(),
            cells(&["Oslo", "Paris", "Oslo", "", "Paris", "Oslo"]),
        );
        let stats = CategoricalStats::from_column(&column);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.top, Some(("Oslo".to_string(), 3)));

        // Tie between two values resolves to the first one seen.
        let column = Column::classify("t".to_string(), cells(&["b", "a", "b", "a"]));
        let stats = CategoricalStats::from_column(&column);
        assert_eq!(stats.top, Some(("b".to_string(), 2)));
    }

    #[test]
    fn test_describe_and_text_rendering() {
        let table = DataTable::new(
            "demo",
            vec![
                Column::classify("price".to_string(), cells(&["1", "2", ""])),
                Column::classify("label".to_string(), cells(&["x", "x", "y"])),
            ],
        );
        let summary = DatasetSummary::describe(&table);
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.columns.len(), 2);

        let text = summary.to_text();
        assert!(text.contains("price: count=2 mean=1.5000"));
        assert!(text.contains("label: count=3 unique=2 top=\"x\" freq=2"));

        let missing = summary.missing_values_text();
        assert!(missing.contains("price: 1"));
        assert!(missing.contains("label: 0"));
    }
}
