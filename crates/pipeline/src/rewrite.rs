//! Question rewrite stage.
//!
//! One completion call; the response must carry an `Answer Type:` line
//! and a `Paraphrased Question:` line, in either order. Parsing is by
//! label lookup, so a response missing either label is a shape error,
//! never silently-wrong data.

use tabqa_llm::CompletionClient;

use crate::error::StageError;
use crate::prompts::{self, PARAPHRASE_LABEL, TYPE_LABEL};

/// Output of the rewrite stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// Predicted answer type, as the model wrote it
    pub answer_type: String,
    /// Paraphrased question fed to codegen
    pub question: String,
}

/// Rewrite one question and predict its answer type.
pub fn rewrite_question(
    client: &CompletionClient,
    question: &str,
    dataset_name: &str,
    schema: &str,
) -> Result<RewriteResult, StageError> {
    let prompt = prompts::render_rewrite_prompt(question, dataset_name, schema);
    let text = client.complete(&prompt)?;
    parse_rewrite_response(&text)
}

pub(crate) fn parse_rewrite_response(text: &str) -> Result<RewriteResult, StageError> {
    let answer_type = labeled_value(text, TYPE_LABEL).ok_or_else(|| {
        StageError::ResponseShape(format!("missing {:?} line", TYPE_LABEL))
    })?;
    let question = labeled_value(text, PARAPHRASE_LABEL).ok_or_else(|| {
        StageError::ResponseShape(format!("missing {:?} line", PARAPHRASE_LABEL))
    })?;

    if answer_type.is_empty() {
        return Err(StageError::ResponseShape("empty answer type".to_string()));
    }
    if question.is_empty() {
        return Err(StageError::ResponseShape(
            "empty paraphrased question".to_string(),
        ));
    }

    Ok(RewriteResult {
        answer_type,
        question,
    })
}

/// First line starting with `label`, with the label and surrounding
/// whitespace removed.
fn labeled_value(text: &str, label: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix(label))
        .map(|rest| rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_first() {
        let result = parse_rewrite_response(
            "Answer Type: bool\nParaphrased Question: Were there any survivors aged under 18?",
        )
        .unwrap();
        assert_eq!(result.answer_type, "bool");
        assert_eq!(result.question, "Were there any survivors aged under 18?");
    }

    #[test]
    fn test_parse_paraphrase_first() {
        let result = parse_rewrite_response(
            "Paraphrased Question: How many rows are there?\nAnswer Type: number",
        )
        .unwrap();
        assert_eq!(result.answer_type, "number");
        assert_eq!(result.question, "How many rows are there?");
    }

    #[test]
    fn test_parse_tolerates_surrounding_chatter() {
        // Some models prepend commentary; only the labeled lines count.
        let result = parse_rewrite_response(
            "Here is my analysis:\n\nAnswer Type: list[category]\nParaphrased Question: Which countries appear?\nHope that helps!",
        )
        .unwrap();
        assert_eq!(result.answer_type, "list[category]");
        assert_eq!(result.question, "Which countries appear?");
    }

    #[test]
    fn test_missing_paraphrase_line_errors() {
        let err = parse_rewrite_response("Answer Type: bool").unwrap_err();
        assert!(matches!(err, StageError::ResponseShape(_)));
        assert!(err.to_string().contains("Paraphrased Question:"));
    }

    #[test]
    fn test_missing_type_line_errors() {
        let err = parse_rewrite_response("Paraphrased Question: anything").unwrap_err();
        assert!(matches!(err, StageError::ResponseShape(_)));
    }

    #[test]
    fn test_empty_response_errors() {
        assert!(parse_rewrite_response("").is_err());
    }

    #[test]
    fn test_empty_values_error() {
        assert!(parse_rewrite_response("Answer Type:\nParaphrased Question: q").is_err());
        assert!(parse_rewrite_response("Answer Type: bool\nParaphrased Question:").is_err());
    }
}
