//! Provenance record for one answered question.

use serde::Serialize;

/// Sentinel output for a question that could not be answered.
pub const UNANSWERED: &str = "-";

/// The externally visible unit of work: one per input question,
/// immutable once returned. Every field serializes as text so the
/// batch driver can persist records row-by-row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    /// Name of the dataset the question ran against
    pub dataset: String,
    /// The user's question, verbatim, always populated
    pub original_question: String,
    /// Paraphrase from the rewrite stage; empty if that stage failed
    pub rewritten_question: String,
    /// Generated source; empty if codegen never ran or failed
    pub code: String,
    /// Predicted answer type, as the model wrote it
    pub answer_type: String,
    /// Rendered answer, or [`UNANSWERED`]
    pub output: String,
}

impl AnswerRecord {
    /// A record carrying only provenance, with the sentinel output.
    /// Stages fill in the remaining fields as they succeed.
    pub fn unanswered(dataset: &str, question: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            original_question: question.to_string(),
            rewritten_question: String::new(),
            code: String::new(),
            answer_type: String::new(),
            output: UNANSWERED.to_string(),
        }
    }

    pub fn is_answered(&self) -> bool {
        self.output != UNANSWERED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanswered_preserves_question() {
        let record = AnswerRecord::unanswered("001_Forbes", "Who is first?");
        assert_eq!(record.dataset, "001_Forbes");
        assert_eq!(record.original_question, "Who is first?");
        assert_eq!(record.output, UNANSWERED);
        assert!(!record.is_answered());
        assert!(record.rewritten_question.is_empty());
        assert!(record.code.is_empty());
        assert!(record.answer_type.is_empty());
    }
}
