//! Two-stage LLM orchestration over tabular datasets.
//!
//! Per question, strictly linear: Schema → Rewrite → Codegen →
//! Execute → Record. The first stage call disambiguates the question
//! and predicts the answer's semantic type; the second synthesizes a
//! Lua function that computes the answer; the executor runs it in a
//! fresh, capability-limited VM. Any stage failure is absorbed into a
//! fail-soft [`AnswerRecord`] so batch runs never abort.

pub mod answer;
pub mod codegen;
pub mod error;
pub mod exec;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod rewrite;

pub use answer::{Answer, AnswerType};
pub use error::StageError;
pub use pipeline::Pipeline;
pub use record::{AnswerRecord, UNANSWERED};
pub use rewrite::RewriteResult;
