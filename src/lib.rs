pub mod analyzer;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;

pub use error::{DataTaleError, QueryFailure};

// Re-export commonly used types
pub use analyzer::{
    AnalysisOrchestrator, ChatClient, ChatMessage, ChatRequest, DatasetInsights, HttpChatClient,
    LlmConfig, RetryPolicy,
};
pub use charts::ChartRenderer;
pub use cli::CliHandler;
pub use loader::DatasetLoader;
pub use models::{Column, ColumnKind, DataTable, DatasetSummary};
pub use report::{DatasetReport, ReportWriter};
