use crate::analyzer::llm_client::ChatMessage;
use crate::models::{DataTable, DatasetSummary};

/// Character caps applied before message construction to bound request size.
pub const SUMMARY_CHAR_CAP: usize = 1000;
pub const SAMPLE_CHAR_CAP: usize = 2000;
pub const SAMPLE_ROW_COUNT: usize = 5;

pub struct PromptTemplate;

impl PromptTemplate {
    /// Messages for the first call: statistical analysis of the dataset.
    pub fn analysis_messages(table: &DataTable, summary: &DatasetSummary) -> Vec<ChatMessage> {
        let columns = table.column_names().join(", ");
        let sample = table.sample_text(SAMPLE_ROW_COUNT);
        let sample = truncate_chars(&sample, SAMPLE_CHAR_CAP);
        let stats = summary.to_text();
        let stats = truncate_chars(&stats, SUMMARY_CHAR_CAP);
        let missing = summary.missing_values_text();

        vec![
            ChatMessage::system("You are a data analysis assistant."),
            ChatMessage::user(format!(
                "Analyze this dataset:\n\nColumns: {columns}\n\nFirst {SAMPLE_ROW_COUNT} Rows:\n{sample}\n\nSummary:\n{stats}\n\nMissing Values:\n{missing}"
            )),
        ]
    }

    /// Messages for the second call: a narrative built on the full analysis
    /// text from the first call.
    pub fn narrative_messages(analysis: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You are a data storytelling assistant."),
            ChatMessage::user(format!(
                "Based on this analysis:\n\n{analysis}\n\nGenerate a narrative about the insights and implications of this dataset."
            )),
        ]
    }
}

/// Truncates to at most `cap` characters, respecting char boundaries.
fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::llm_client::Role;
    use crate::models::Column;

    fn demo_table() -> DataTable {
        DataTable::new(
            "demo",
            vec![
                Column::classify(
                    "price".to_string(),
                    vec![Some("1".to_string()), Some("2".to_string()), None],
                ),
                Column::classify(
                    "label".to_string(),
                    vec![
                        Some("x".to_string()),
                        Some("y".to_string()),
                        Some("x".to_string()),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_analysis_messages_shape() {
        let table = demo_table();
        let summary = DatasetSummary::describe(&table);
        let messages = PromptTemplate::analysis_messages(&table, &summary);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("data analysis assistant"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Columns: price, label"));
        assert!(messages[1].content.contains("Missing Values:"));
        assert!(messages[1].content.contains("price: 1"));
    }

    #[test]
    fn test_narrative_messages_carry_full_analysis() {
        let analysis = "a".repeat(5000);
        let messages = PromptTemplate::narrative_messages(&analysis);

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("storytelling"));
        // The narrative prompt is never truncated.
        assert!(messages[1].content.contains(&analysis));
    }
}
