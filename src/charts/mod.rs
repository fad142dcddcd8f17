pub mod renderer;

use crate::error::DataTaleError;
use crate::models::DataTable;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Renders the fixed chart set for a dataset into the output directory.
///
/// Chart file names are deterministic: `<dataset>_<suffix>.png`. A chart
/// that fails to render is logged and skipped; the dataset continues.
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn chart_path(&self, dataset: &str, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{dataset}_{suffix}.png"))
    }

    pub fn render_all(&self, table: &DataTable) -> Vec<PathBuf> {
        let mut rendered = Vec::new();
        let numeric = table.numeric_columns();

        if numeric.len() >= 2 {
            let path = self.chart_path(&table.name, "correlation_heatmap");
            self.record(
                &mut rendered,
                "correlation_heatmap",
                renderer::draw_correlation_heatmap(&numeric, &path),
                path,
            );
        }

        if let Some(first) = numeric.first() {
            let path = self.chart_path(&table.name, "distribution");
            self.record(
                &mut rendered,
                "distribution",
                renderer::draw_distribution(first, &path),
                path,
            );
        }

        if numeric.len() >= 2 {
            let path = self.chart_path(&table.name, "boxplot");
            self.record(
                &mut rendered,
                "boxplot",
                renderer::draw_boxplot(&numeric, &path),
                path,
            );
        }

        if table.has_missing() {
            let path = self.chart_path(&table.name, "missing_data");
            self.record(
                &mut rendered,
                "missing_data",
                renderer::draw_missing_data(table, &path),
                path,
            );
        }

        rendered
    }

    fn record(
        &self,
        rendered: &mut Vec<PathBuf>,
        chart: &str,
        result: Result<(), Box<dyn std::error::Error>>,
        path: PathBuf,
    ) {
        match result.map_err(|e| DataTaleError::ChartError(e.to_string())) {
            Ok(()) => {
                debug!(chart, path = %path.display(), "chart rendered");
                rendered.push(path);
            }
            Err(e) => {
                error!(chart, error = %e, "failed to render chart");
                self.remove_partial(&path);
            }
        }
    }

    // A failed render can leave a partial file behind.
    fn remove_partial(&self, path: &Path) {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}
