// tabqa CLI - answer natural-language questions about tabular data
// by delegating reasoning to an LLM completion service.

mod batch;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tabqa_llm::{config, CompletionClient, CompletionError};
use tabqa_pipeline::Pipeline;
use tabqa_table::{load_csv, schema_description};

use exit_codes::{EXIT_IO, EXIT_LLM_MISSING_KEY, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tabqa")]
#[command(about = "Answer natural-language questions about tabular datasets via an LLM")]
#[command(version)]
struct Cli {
    /// Completion-service API key (overrides TABQA_API_KEY and settings)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, global = true)]
    model: Option<String>,

    /// Completion-service base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question against one CSV dataset
    #[command(after_help = "\
Examples:
  tabqa ask 'Is the person with the highest net worth self-made?' -f forbes.csv
  tabqa ask 'How many survivors were there?' -f titanic.csv --json")]
    Ask {
        /// The question, in natural language
        question: String,

        /// Dataset CSV file
        #[arg(long, short = 'f')]
        file: PathBuf,

        /// Dataset name used in prompts (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Emit the answer record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a question set and persist the records as CSV
    #[command(after_help = "\
The question file needs 'question' and 'dataset' columns (an optional
'answer' column is copied through). Each dataset name resolves to
<data-dir>/<name>.csv, loaded once for the whole run.")]
    Batch {
        /// CSV file with one question per row
        #[arg(long, short = 'q')]
        questions: PathBuf,

        /// Directory holding the referenced dataset CSVs
        #[arg(long)]
        data_dir: PathBuf,

        /// Output CSV path
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Print the schema description of a CSV dataset
    Schema {
        /// Dataset CSV file
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask {
            ref question,
            ref file,
            ref name,
            json,
        } => cmd_ask(&cli, question, file, name.as_deref(), json),
        Commands::Batch {
            ref questions,
            ref data_dir,
            ref output,
        } => batch::cmd_batch(&cli, questions, data_dir, output),
        Commands::Schema { ref file } => cmd_schema(file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn llm(err: CompletionError) -> Self {
        let code = match err {
            CompletionError::MissingKey => EXIT_LLM_MISSING_KEY,
            _ => exit_codes::EXIT_ERROR,
        };
        let hint = match err {
            CompletionError::MissingKey => Some(format!(
                "set {} or pass --api-key",
                config::API_KEY_ENV
            )),
            _ => None,
        };
        Self {
            code,
            message: err.to_string(),
            hint,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Client construction
// ============================================================================

/// Build the codegen client and, when a second key is configured, a
/// separate rewrite client.
fn build_clients(cli: &Cli) -> Result<(CompletionClient, Option<CompletionClient>), CliError> {
    let resolved = config::resolve(
        cli.api_key.clone(),
        cli.model.clone(),
        cli.api_base.clone(),
    );

    let main = CompletionClient::new(&resolved).map_err(CliError::llm)?;

    let rewrite = config::rewrite_api_key().map(|key| {
        CompletionClient::with_parts(&resolved.api_base, &resolved.model, &key)
    });

    Ok((main, rewrite))
}

// ============================================================================
// ask
// ============================================================================

fn cmd_ask(
    cli: &Cli,
    question: &str,
    file: &PathBuf,
    name: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError::io(format!("file not found: {}", file.display())));
    }
    let dataset = load_csv(file).map_err(|e| CliError::io(e.to_string()))?;
    let dataset = std::sync::Arc::new(dataset);

    let dataset_name = match name {
        Some(n) => n.to_string(),
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "dataset".to_string()),
    };

    let (main_client, rewrite_client) = build_clients(cli)?;
    let record = match rewrite_client {
        Some(ref rewrite) => {
            Pipeline::with_clients(rewrite, &main_client).answer(&dataset, &dataset_name, question)
        }
        None => Pipeline::new(&main_client).answer(&dataset, &dataset_name, question),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).unwrap_or_default()
        );
    } else {
        println!("Dataset:    {}", record.dataset);
        println!("Question:   {}", record.original_question);
        println!("Rewritten:  {}", record.rewritten_question);
        println!("Type:       {}", record.answer_type);
        println!("Output:     {}", record.output);
        if !record.code.is_empty() {
            println!("Code:");
            for line in record.code.lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}

// ============================================================================
// schema
// ============================================================================

fn cmd_schema(file: &PathBuf) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError::io(format!("file not found: {}", file.display())));
    }
    let dataset = load_csv(file).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", schema_description(&dataset));
    Ok(())
}
