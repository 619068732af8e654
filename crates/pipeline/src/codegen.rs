//! Code generation stage.
//!
//! One completion call; the only post-processing is stripping
//! formatting wrappers (fenced code blocks, a leading language tag).
//! Syntactic and semantic correctness of the returned code is entirely
//! the model's responsibility; the executor is where it gets checked.

use tabqa_llm::CompletionClient;

use crate::error::StageError;
use crate::prompts;

/// Generate the Lua source answering one rewritten question.
pub fn generate_code(
    client: &CompletionClient,
    question: &str,
    dataset_name: &str,
    schema: &str,
    answer_type: &str,
) -> Result<String, StageError> {
    let prompt = prompts::render_codegen_prompt(question, dataset_name, schema, answer_type);
    let text = client.complete(&prompt)?;
    let code = strip_code_fences(&text);
    if code.is_empty() {
        return Err(StageError::CodeSynthesis(
            "model returned an empty code response".to_string(),
        ));
    }
    Ok(code)
}

/// Remove a surrounding fenced code block and a leading language tag.
///
/// Idempotent: applying it to already-bare code changes nothing.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let mut out = text.trim();

    if let Some(rest) = out.strip_prefix("```") {
        // Drop the rest of the fence line (including any language tag)
        out = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    } else if let Some(rest) = out.strip_prefix("lua\n") {
        // Stray language tag without a fence
        out = rest;
    }

    if let Some(rest) = out.trim_end().strip_suffix("```") {
        out = rest;
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = "function answer_question(dataset, schema, question, answer_type)\n    return 42\nend";

    #[test]
    fn test_strip_fence_with_language_tag() {
        let wrapped = format!("```lua\n{}\n```", BARE);
        assert_eq!(strip_code_fences(&wrapped), BARE);
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        let wrapped = format!("```\n{}\n```", BARE);
        assert_eq!(strip_code_fences(&wrapped), BARE);
    }

    #[test]
    fn test_strip_stray_language_tag() {
        let wrapped = format!("lua\n{}", BARE);
        assert_eq!(strip_code_fences(&wrapped), BARE);
    }

    #[test]
    fn test_bare_code_unchanged() {
        assert_eq!(strip_code_fences(BARE), BARE);
    }

    #[test]
    fn test_stripping_is_idempotent() {
        let wrapped = format!("```lua\n{}\n```", BARE);
        let once = strip_code_fences(&wrapped);
        let twice = strip_code_fences(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let wrapped = format!("\n\n```lua\n{}\n```\n\n", BARE);
        assert_eq!(strip_code_fences(&wrapped), BARE);
    }

    #[test]
    fn test_fence_only_yields_empty() {
        assert_eq!(strip_code_fences("```lua\n```"), "");
        assert_eq!(strip_code_fences("```"), "");
    }
}
