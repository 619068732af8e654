//! Stage error taxonomy.
//!
//! Four failure classes, one per unreliable step. All of them stop at
//! the orchestrator boundary; none crosses the batch loop.

use tabqa_llm::CompletionError;

#[derive(Debug)]
pub enum StageError {
    /// Completion service unreachable or returned a failure
    Completion(CompletionError),
    /// A completion response did not match the expected label structure
    ResponseShape(String),
    /// Generated code failed to compile or defines no entry function
    CodeSynthesis(String),
    /// Generated code raised during execution or returned a bad shape
    Execution(String),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::Completion(e) => write!(f, "completion request failed: {}", e),
            StageError::ResponseShape(msg) => write!(f, "malformed model response: {}", msg),
            StageError::CodeSynthesis(msg) => write!(f, "generated code rejected: {}", msg),
            StageError::Execution(msg) => write!(f, "generated code failed: {}", msg),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Completion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CompletionError> for StageError {
    fn from(e: CompletionError) -> Self {
        StageError::Completion(e)
    }
}
