pub mod args;

pub use args::Cli;

use crate::analyzer::{AnalysisOrchestrator, LlmConfig, RetryPolicy};
use crate::charts::ChartRenderer;
use crate::config;
use crate::error::DataTaleError;
use crate::loader::DatasetLoader;
use crate::report::{DatasetReport, ReportWriter};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Drives the batch: one dataset at a time, strictly sequential. Per-file
/// failures are logged and skipped; only startup failures abort the process.
pub struct CliHandler {
    cli: Cli,
    llm: LlmConfig,
}

impl CliHandler {
    pub fn new(cli: Cli, api_token: String) -> Self {
        let llm = LlmConfig::new(config::DEFAULT_ENDPOINT, api_token, cli.model.clone())
            .with_timeout(Duration::from_secs(cli.timeout))
            .with_retry(RetryPolicy::default());
        Self { cli, llm }
    }

    /// Full configuration injection; tests point the endpoint at a mock
    /// server and shrink the backoff.
    pub fn with_llm_config(cli: Cli, llm: LlmConfig) -> Self {
        Self { cli, llm }
    }

    pub async fn run(&self) -> Result<i32, DataTaleError> {
        std::fs::create_dir_all(&self.cli.output_dir)?;
        let orchestrator = AnalysisOrchestrator::new(self.llm.clone())?;

        for path in &self.cli.files {
            if let Err(e) = self.process_dataset(&orchestrator, path).await {
                error!(path = %path.display(), error = %e, "skipping dataset");
            }
        }

        Ok(0)
    }

    async fn process_dataset(
        &self,
        orchestrator: &AnalysisOrchestrator,
        path: &Path,
    ) -> Result<(), DataTaleError> {
        let table = DatasetLoader::load(path)?;
        info!(
            dataset = %table.name,
            rows = table.row_count(),
            columns = table.columns.len(),
            "loaded dataset"
        );

        let summary = crate::models::DatasetSummary::describe(&table);

        let renderer = ChartRenderer::new(&self.cli.output_dir);
        let charts = renderer.render_all(&table);

        // A terminal LLM failure aborts only the LLM-dependent steps; the
        // report is still written with an explicit placeholder.
        let report = match orchestrator.run(&table, &summary).await {
            Ok(insights) => DatasetReport::new(&table.name)
                .with_narrative(insights.narrative)
                .with_charts(charts),
            Err(e) => {
                error!(dataset = %table.name, error = %e, "insights unavailable");
                DatasetReport::new(&table.name).with_charts(charts)
            }
        };

        let writer = ReportWriter::new(&self.cli.output_dir);
        let report_path = writer.write(&report)?;
        info!(report = %report_path.display(), "report written");

        Ok(())
    }
}
