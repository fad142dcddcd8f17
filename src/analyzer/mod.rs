// Analyzer module - LLM integration and the two-call orchestration

pub mod llm_client;
pub mod orchestrator;
pub mod prompts;

pub use llm_client::{
    ChatClient, ChatMessage, ChatRequest, HttpChatClient, LlmConfig, RetryPolicy, Role,
};
pub use orchestrator::{AnalysisOrchestrator, DatasetInsights};
pub use prompts::PromptTemplate;
