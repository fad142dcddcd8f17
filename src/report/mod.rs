use crate::error::DataTaleError;
use std::path::{Path, PathBuf};

/// Assembled per-dataset report content. `narrative` is `None` when the LLM
/// calls failed terminally; the writer then emits an explicit placeholder
/// instead of dropping the report.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub dataset_name: String,
    pub narrative: Option<String>,
    pub charts: Vec<PathBuf>,
}

impl DatasetReport {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            narrative: None,
            charts: Vec::new(),
        }
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn with_charts(mut self, charts: Vec<PathBuf>) -> Self {
        self.charts = charts;
        self
    }

    pub fn insights_available(&self) -> bool {
        self.narrative.is_some()
    }
}

pub const INSIGHTS_UNAVAILABLE_PLACEHOLDER: &str =
    "*Insights unavailable: the language model could not be reached for this dataset.*";

/// Serializes a [`DatasetReport`] to Markdown in the output directory.
/// Reports are dataset-scoped: `<dataset>_report.md`.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn report_path(&self, dataset: &str) -> PathBuf {
        self.output_dir.join(format!("{dataset}_report.md"))
    }

    pub fn write(&self, report: &DatasetReport) -> Result<PathBuf, DataTaleError> {
        let path = self.report_path(&report.dataset_name);
        std::fs::write(&path, Self::render(report))?;
        Ok(path)
    }

    fn render(report: &DatasetReport) -> String {
        let mut doc = String::new();
        doc.push_str(&format!("# Analysis Report: {}\n\n", report.dataset_name));

        match &report.narrative {
            Some(narrative) => doc.push_str(narrative),
            None => doc.push_str(INSIGHTS_UNAVAILABLE_PLACEHOLDER),
        }
        doc.push('\n');

        doc.push_str("\n## Visualizations\n\n");
        for chart in &report.charts {
            // Images sit next to the report, so references are file names.
            let file_name = file_name_of(chart);
            doc.push_str(&format!("![{file_name}]({file_name})\n"));
        }

        doc
    }
}

fn file_name_of(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
