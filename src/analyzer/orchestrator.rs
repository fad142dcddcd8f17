use crate::analyzer::llm_client::{ChatClient, ChatRequest, HttpChatClient, LlmConfig};
use crate::analyzer::prompts::PromptTemplate;
use crate::error::DataTaleError;
use crate::models::{DataTable, DatasetSummary};
use std::sync::Arc;
use tracing::debug;

/// Output of the two-call sequence for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInsights {
    pub analysis: String,
    pub narrative: String,
}

/// Sequences the two LLM calls per dataset: analysis first, then a narrative
/// built on the full analysis text. The narrative call is never attempted
/// when the analysis call fails.
pub struct AnalysisOrchestrator {
    client: Arc<dyn ChatClient>,
}

impl AnalysisOrchestrator {
    pub fn new(config: LlmConfig) -> Result<Self, DataTaleError> {
        Ok(Self {
            client: Arc::new(HttpChatClient::new(config)?),
        })
    }

    /// Substitutes a fake client; used by tests.
    pub fn with_client(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        table: &DataTable,
        summary: &DatasetSummary,
    ) -> Result<DatasetInsights, DataTaleError> {
        let request = ChatRequest::new(
            self.client.model_name(),
            PromptTemplate::analysis_messages(table, summary),
        );
        let analysis = self.client.query(&request).await?;
        debug!(dataset = %table.name, chars = analysis.len(), "analysis received");

        let request = ChatRequest::new(
            self.client.model_name(),
            PromptTemplate::narrative_messages(&analysis),
        );
        let narrative = self.client.query(&request).await?;
        debug!(dataset = %table.name, chars = narrative.len(), "narrative received");

        Ok(DatasetInsights {
            analysis,
            narrative,
        })
    }
}
