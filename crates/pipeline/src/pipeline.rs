//! Per-question orchestration.
//!
//! Each stage's output feeds the next; each LLM call and the code
//! execution happen exactly once per question. The first stage error
//! stops the chain, gets logged with the original question, and the
//! record keeps whatever was computed before the failure plus the
//! sentinel output. No error ever crosses the batch loop.

use std::sync::Arc;

use log::{debug, warn};

use tabqa_llm::CompletionClient;
use tabqa_table::{schema_description, Dataset};

use crate::answer::AnswerType;
use crate::codegen;
use crate::error::StageError;
use crate::exec;
use crate::record::AnswerRecord;
use crate::rewrite;

/// The question-answering pipeline. Stateless across questions.
pub struct Pipeline<'a> {
    rewrite_client: &'a CompletionClient,
    codegen_client: &'a CompletionClient,
}

impl<'a> Pipeline<'a> {
    /// One client serves both stages.
    pub fn new(client: &'a CompletionClient) -> Self {
        Self {
            rewrite_client: client,
            codegen_client: client,
        }
    }

    /// Separate clients per stage (separate keys spread rate limits).
    pub fn with_clients(
        rewrite_client: &'a CompletionClient,
        codegen_client: &'a CompletionClient,
    ) -> Self {
        Self {
            rewrite_client,
            codegen_client,
        }
    }

    /// Answer one question against one dataset. Never fails: any stage
    /// error is absorbed into a fail-soft record.
    pub fn answer(
        &self,
        dataset: &Arc<Dataset>,
        dataset_name: &str,
        question: &str,
    ) -> AnswerRecord {
        let mut record = AnswerRecord::unanswered(dataset_name, question);
        if let Err(err) = self.run(dataset, dataset_name, question, &mut record) {
            warn!("question failed: {} (question: {:?})", err, question);
        }
        record
    }

    fn run(
        &self,
        dataset: &Arc<Dataset>,
        dataset_name: &str,
        question: &str,
        record: &mut AnswerRecord,
    ) -> Result<(), StageError> {
        let schema = schema_description(dataset);
        debug!("schema for {:?}: {}", dataset_name, schema);

        let rewrite =
            rewrite::rewrite_question(self.rewrite_client, question, dataset_name, &schema)?;
        record.answer_type = rewrite.answer_type.clone();
        record.rewritten_question = rewrite.question.clone();
        debug!(
            "rewrite: type={:?} question={:?}",
            rewrite.answer_type, rewrite.question
        );

        let code = codegen::generate_code(
            self.codegen_client,
            &rewrite.question,
            dataset_name,
            &schema,
            &rewrite.answer_type,
        )?;
        record.code = code.clone();

        let answer = exec::execute(&code, dataset, &schema, &rewrite.question, &rewrite.answer_type)?;

        // Type-shape check against the prediction, when it parses as
        // one of the known types. Unknown predictions skip the check.
        if let Some(expected) = AnswerType::parse(&rewrite.answer_type) {
            if !answer.matches(expected) {
                return Err(StageError::Execution(format!(
                    "answer shape {} does not match predicted type {}",
                    answer.shape_name(),
                    expected.as_str()
                )));
            }
        }

        record.output = answer.to_string();
        Ok(())
    }
}
