use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// A single dataset column. Cells are kept as raw strings; empty cells are
/// missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Option<String>>,
}

impl Column {
    /// Builds a column and decides its kind: a column is numeric when every
    /// non-missing cell parses as a float and at least one cell is present.
    pub fn classify(name: String, cells: Vec<Option<String>>) -> Self {
        let mut any_present = false;
        let mut all_numeric = true;

        for cell in cells.iter().flatten() {
            any_present = true;
            if cell.trim().parse::<f64>().is_err() {
                all_numeric = false;
                break;
            }
        }

        let kind = if any_present && all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        };

        Self { name, kind, cells }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn present_count(&self) -> usize {
        self.cells.len() - self.missing_count()
    }

    /// Non-missing cells parsed as floats, in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.cells
            .iter()
            .flatten()
            .filter_map(|cell| cell.trim().parse::<f64>().ok())
            .collect()
    }

    /// All cells parsed as floats, aligned by row index. Used for pairwise
    /// computations such as correlations.
    pub fn numeric_cells(&self) -> Vec<Option<f64>> {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().and_then(|v| v.trim().parse::<f64>().ok()))
            .collect()
    }
}

/// A loaded tabular dataset in columnar form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<Column>,
}

impl DataTable {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    pub fn has_missing(&self) -> bool {
        self.columns.iter().any(|c| c.missing_count() > 0)
    }

    /// Renders the header and the first `rows` rows as plain text for prompt
    /// construction. Missing cells render as empty fields.
    pub fn sample_text(&self, rows: usize) -> String {
        let mut lines = Vec::with_capacity(rows + 1);
        lines.push(self.column_names().join(", "));

        for row in 0..rows.min(self.row_count()) {
            let fields: Vec<&str> = self
                .columns
                .iter()
                .map(|c| c.cells[row].as_deref().unwrap_or(""))
                .collect();
            lines.push(fields.join(", "));
        }

        lines.join("\n")
    }
}
