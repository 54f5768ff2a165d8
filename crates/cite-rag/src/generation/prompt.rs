//! Prompt templates for RAG generation

use crate::types::RerankedDocument;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join reranked texts in rank order, separated by a blank line
    pub fn build_context(documents: &[RerankedDocument]) -> String {
        documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the grounded prompt.
    ///
    /// Passages are cited as `[1]`, `[2]`, ... in context order, which is the
    /// order of the citation list returned with the answer.
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Answer the question ONLY using the context below.
Context passages are separated by blank lines.
Add inline citations like [1], [2], citing the n-th passage as [n].
If the answer is not in the context, say "I don't know".

Context:
{}

Question: {}"#,
            context, question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordMetadata;

    fn doc(text: &str, chunk: u32) -> RerankedDocument {
        RerankedDocument {
            text: text.to_string(),
            metadata: RecordMetadata {
                source: "doc1".to_string(),
                chunk,
            },
            similarity_score: 0.5,
            relevance_score: 0.5,
            retrieval_rank: chunk as usize,
        }
    }

    #[test]
    fn test_context_blank_line_join() {
        let context = PromptBuilder::build_context(&[doc("first", 0), doc("second", 1)]);
        assert_eq!(context, "first\n\nsecond");
    }

    #[test]
    fn test_prompt_contains_rules_and_question() {
        let prompt = PromptBuilder::build_rag_prompt(
            "What is the capital of France?",
            "Paris is the capital of France.",
        );
        assert!(prompt.contains("ONLY using the context"));
        assert!(prompt.contains("[1], [2]"));
        assert!(prompt.contains("separated by blank lines"));
        assert!(!prompt.contains("numbered"));
        assert!(prompt.contains("\"I don't know\""));
        assert!(prompt.contains("Context:\nParis is the capital of France.\n\nQuestion: What is the capital of France?"));
    }
}
