pub mod summary;
pub mod table;

pub use summary::{CategoricalStats, ColumnSummary, DatasetSummary, NumericStats};
pub use table::{Column, ColumnKind, DataTable};
