//! Batch mode: run a CSV of questions through the pipeline and write
//! one answer record per row.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use tabqa_pipeline::{AnswerRecord, Pipeline};
use tabqa_table::{load_csv, DatasetRegistry};

use crate::{build_clients, Cli, CliError};

/// One row of the input question file.
#[derive(Debug, Deserialize)]
struct QuestionRow {
    question: String,
    dataset: String,
    #[serde(default)]
    answer: Option<String>,
}

/// One row of the output file. Header names match the record fields
/// downstream consumers expect.
#[derive(Debug, Serialize)]
struct ResultRow {
    #[serde(rename = "Dataset Used")]
    dataset: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Rewritten Question")]
    rewritten_question: String,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Expected Answer Type")]
    answer_type: String,
    #[serde(rename = "Answer")]
    answer: String,
    #[serde(rename = "Expected Answer")]
    expected: String,
}

impl ResultRow {
    fn from_record(record: AnswerRecord, expected: Option<String>) -> Self {
        Self {
            dataset: record.dataset,
            question: record.original_question,
            rewritten_question: record.rewritten_question,
            code: record.code,
            answer_type: record.answer_type,
            answer: record.output,
            expected: expected.unwrap_or_default(),
        }
    }
}

pub fn cmd_batch(
    cli: &Cli,
    questions: &PathBuf,
    data_dir: &PathBuf,
    output: &PathBuf,
) -> Result<(), CliError> {
    let rows = read_questions(questions)?;
    if rows.is_empty() {
        return Err(CliError::args(format!(
            "no questions found in {}",
            questions.display()
        )));
    }

    let registry = load_datasets(&rows, data_dir)?;

    let (main_client, rewrite_client) = build_clients(cli)?;
    let pipeline = match rewrite_client {
        Some(ref rewrite) => Pipeline::with_clients(rewrite, &main_client),
        None => Pipeline::new(&main_client),
    };

    let mut writer = csv::Writer::from_path(output)
        .map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;

    let total = rows.len();
    let mut answered = 0usize;
    for (i, row) in rows.into_iter().enumerate() {
        eprintln!("[{}/{}] {}", i + 1, total, row.question);
        // Presence was checked during warm-up.
        let dataset = registry
            .get(&row.dataset)
            .ok_or_else(|| CliError::io(format!("dataset missing from registry: {}", row.dataset)))?;

        let record = pipeline.answer(&dataset, &row.dataset, &row.question);
        if record.is_answered() {
            answered += 1;
        }
        writer
            .serialize(ResultRow::from_record(record, row.answer))
            .map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;

    info!("batch complete: {}/{} answered", answered, total);
    eprintln!(
        "wrote {} ({}/{} answered)",
        output.display(),
        answered,
        total
    );
    Ok(())
}

fn read_questions(path: &Path) -> Result<Vec<QuestionRow>, CliError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: QuestionRow = result.map_err(|e| {
            CliError::io(format!("malformed question file {}: {}", path.display(), e))
                .with_hint("expected 'question' and 'dataset' columns")
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load every referenced dataset once up front. A missing or unreadable
/// dataset file fails the whole run before any completion request is made.
fn load_datasets(rows: &[QuestionRow], data_dir: &Path) -> Result<DatasetRegistry, CliError> {
    let mut registry = DatasetRegistry::new();
    let names: HashSet<&str> = rows.iter().map(|r| r.dataset.as_str()).collect();
    for name in names {
        let path = data_dir.join(format!("{}.csv", name));
        if !path.exists() {
            return Err(CliError::io(format!(
                "dataset file not found: {}",
                path.display()
            ))
            .with_hint(format!("referenced by question rows as '{}'", name)));
        }
        let dataset =
            load_csv(&path).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
        if dataset.row_count() == 0 {
            warn!("dataset '{}' has no rows", name);
        }
        registry.insert(name, dataset);
    }
    info!("loaded {} dataset(s) from {}", registry.len(), data_dir.display());
    Ok(registry)
}
