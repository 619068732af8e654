//! Isolated execution of generated code.
//!
//! Each execution builds a fresh Lua VM with a restricted stdlib
//! (table/string/math; no io, no os, no package loading), an
//! instruction budget, and a wall-clock timeout. The dataset is only
//! reachable through a read-only userdata API, so the worst a bad
//! snippet can do is burn its budget and fail.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mlua::{
    HookTriggers, Lua, LuaOptions, StdLib, UserData, UserDataMethods, Value, VmState,
};

use tabqa_table::{ColumnData, Dataset};

use crate::answer::Answer;
use crate::error::StageError;
use crate::prompts::ENTRY_FUNCTION;

/// Hard ceiling on executed Lua instructions per question.
pub const INSTRUCTION_LIMIT: i64 = 50_000_000;

/// How often the budget hook fires (every N instructions).
const INSTRUCTION_HOOK_INTERVAL: u32 = 10_000;

/// Wall-clock ceiling; catches patterns that burn instructions slowly.
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only dataset surface exposed to generated code.
struct DatasetHandle(Arc<Dataset>);

impl UserData for DatasetHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        // nrows() -> integer
        methods.add_method("nrows", |_, this, ()| Ok(this.0.row_count()));

        // columns() -> { name, ... }
        methods.add_method("columns", |_, this, ()| {
            Ok(this
                .0
                .columns()
                .iter()
                .map(|c| c.name.clone())
                .collect::<Vec<String>>())
        });

        // col(name) -> 1-based array of values, nil for nulls
        methods.add_method("col", |lua, this, name: String| {
            let column = this.0.column(&name).ok_or_else(|| {
                mlua::Error::RuntimeError(format!("no column named {:?}", name))
            })?;

            let table = lua.create_table()?;
            match column.data() {
                ColumnData::Bool(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if let Some(b) = v {
                            table.raw_set(i + 1, *b)?;
                        }
                    }
                }
                ColumnData::Int64(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if let Some(n) = v {
                            table.raw_set(i + 1, *n)?;
                        }
                    }
                }
                ColumnData::Float64(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if let Some(n) = v {
                            table.raw_set(i + 1, *n)?;
                        }
                    }
                }
                ColumnData::Str(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if let Some(s) = v {
                            table.raw_set(i + 1, s.as_str())?;
                        }
                    }
                }
            }
            Ok(table)
        });
    }
}

/// Compile the generated source, extract `answer_question`, invoke it
/// with `(dataset, schema, question, answer_type)`, and marshal the
/// returned value.
pub fn execute(
    code: &str,
    dataset: &Arc<Dataset>,
    schema: &str,
    question: &str,
    answer_type: &str,
) -> Result<Answer, StageError> {
    let lua = Lua::new_with(
        StdLib::TABLE | StdLib::STRING | StdLib::MATH,
        LuaOptions::default(),
    )
    .map_err(|e| StageError::Execution(format!("failed to build Lua VM: {}", e)))?;

    install_budget_hook(&lua);

    lua.load(code)
        .exec()
        .map_err(|e| StageError::CodeSynthesis(e.to_string()))?;

    let func: mlua::Function = lua.globals().get(ENTRY_FUNCTION).map_err(|_| {
        StageError::CodeSynthesis(format!(
            "generated code does not define a {:?} function",
            ENTRY_FUNCTION
        ))
    })?;

    let handle = lua
        .create_userdata(DatasetHandle(dataset.clone()))
        .map_err(|e| StageError::Execution(e.to_string()))?;

    let value: Value = func
        .call((handle, schema, question, answer_type))
        .map_err(|e| StageError::Execution(e.to_string()))?;

    lua_to_answer(&value)
}

fn install_budget_hook(lua: &Lua) {
    let start = Instant::now();
    let budget = Arc::new(AtomicI64::new(INSTRUCTION_LIMIT));

    lua.set_hook(
        HookTriggers::new().every_nth_instruction(INSTRUCTION_HOOK_INTERVAL),
        move |_lua, _debug| {
            if start.elapsed() > EXECUTION_TIMEOUT {
                return Err(mlua::Error::RuntimeError(format!(
                    "execution timeout ({}s limit)",
                    EXECUTION_TIMEOUT.as_secs()
                )));
            }

            let remaining =
                budget.fetch_sub(INSTRUCTION_HOOK_INTERVAL as i64, Ordering::Relaxed);
            if remaining <= 0 {
                Err(mlua::Error::RuntimeError(format!(
                    "instruction limit exceeded ({} instructions)",
                    INSTRUCTION_LIMIT
                )))
            } else {
                Ok(VmState::Continue)
            }
        },
    );
}

fn lua_to_answer(value: &Value) -> Result<Answer, StageError> {
    match value {
        Value::Boolean(b) => Ok(Answer::Bool(*b)),
        Value::Integer(i) => Ok(Answer::Int(*i)),
        Value::Number(n) => Ok(Answer::Float(*n)),
        Value::String(s) => Ok(Answer::Text(
            s.to_str()
                .map_err(|e| StageError::Execution(e.to_string()))?
                .to_string(),
        )),
        Value::Table(t) => table_to_list(t),
        Value::Nil => Err(StageError::Execution(
            "generated code returned nil".to_string(),
        )),
        other => Err(StageError::Execution(format!(
            "unsupported return type: {}",
            other.type_name()
        ))),
    }
}

fn table_to_list(table: &mlua::Table) -> Result<Answer, StageError> {
    let mut texts: Vec<String> = Vec::new();
    let mut numbers: Vec<f64> = Vec::new();

    for item in table.sequence_values::<Value>() {
        let item = item.map_err(|e| StageError::Execution(e.to_string()))?;
        match item {
            Value::String(s) if numbers.is_empty() => texts.push(
                s.to_str()
                    .map_err(|e| StageError::Execution(e.to_string()))?
                    .to_string(),
            ),
            Value::Integer(i) if texts.is_empty() => numbers.push(i as f64),
            Value::Number(n) if texts.is_empty() => numbers.push(n),
            _ => {
                return Err(StageError::Execution(
                    "lists must contain only strings or only numbers".to_string(),
                ))
            }
        }
    }

    if !texts.is_empty() {
        Ok(Answer::TextList(texts))
    } else if !numbers.is_empty() {
        Ok(Answer::NumberList(numbers))
    } else {
        // Empty sequence: shape is ambiguous, render as []
        Ok(Answer::TextList(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabqa_table::Column;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::new(vec![
            Column::new(
                "selfMade",
                ColumnData::Bool(vec![Some(true), Some(false), Some(true)]),
            ),
            Column::new(
                "finalWorth",
                ColumnData::Int64(vec![Some(90), Some(150), Some(40)]),
            ),
            Column::new(
                "country",
                ColumnData::Str(vec![Some("India".into()), None, Some("Japan".into())]),
            ),
        ]))
    }

    fn run(code: &str) -> Result<Answer, StageError> {
        execute(code, &dataset(), "schema", "question", "bool")
    }

    #[test]
    fn test_literal_return_round_trips() {
        let answer = run("function answer_question(d, s, q, t) return 42 end").unwrap();
        assert_eq!(answer, Answer::Int(42));

        let answer = run("function answer_question(d, s, q, t) return 'CEO' end").unwrap();
        assert_eq!(answer, Answer::Text("CEO".into()));

        let answer = run("function answer_question(d, s, q, t) return true end").unwrap();
        assert_eq!(answer, Answer::Bool(true));
    }

    #[test]
    fn test_arguments_are_passed_through() {
        let answer = run("function answer_question(d, s, q, t) return s end").unwrap();
        assert_eq!(answer, Answer::Text("schema".into()));

        let answer = run("function answer_question(d, s, q, t) return q end").unwrap();
        assert_eq!(answer, Answer::Text("question".into()));
    }

    #[test]
    fn test_dataset_api() {
        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                return dataset:nrows()
            end
        "#;
        assert_eq!(run(code).unwrap(), Answer::Int(3));

        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                local worth = dataset:col("finalWorth")
                local total = 0
                for i = 1, dataset:nrows() do
                    if worth[i] ~= nil then total = total + worth[i] end
                end
                return total
            end
        "#;
        assert_eq!(run(code).unwrap(), Answer::Int(280));
    }

    #[test]
    fn test_null_cells_are_nil() {
        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                local country = dataset:col("country")
                local count = 0
                for i = 1, dataset:nrows() do
                    if country[i] == nil then count = count + 1 end
                end
                return count
            end
        "#;
        assert_eq!(run(code).unwrap(), Answer::Int(1));
    }

    #[test]
    fn test_missing_column_raises_execution_error() {
        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                return dataset:col("nonexistent")[1]
            end
        "#;
        let err = run(code).unwrap_err();
        assert!(matches!(err, StageError::Execution(_)));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_string_list_marshals() {
        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                return {'India', 'Japan'}
            end
        "#;
        assert_eq!(
            run(code).unwrap(),
            Answer::TextList(vec!["India".into(), "Japan".into()])
        );
    }

    #[test]
    fn test_number_list_marshals() {
        let code = r#"
            function answer_question(dataset, schema, question, answer_type)
                return {20.0, 30.4, 42.1}
            end
        "#;
        assert_eq!(run(code).unwrap(), Answer::NumberList(vec![20.0, 30.4, 42.1]));
    }

    #[test]
    fn test_mixed_list_rejected() {
        let code = r#"
            function answer_question(d, s, q, t) return {'a', 1} end
        "#;
        assert!(matches!(run(code).unwrap_err(), StageError::Execution(_)));
    }

    #[test]
    fn test_nil_return_rejected() {
        let code = "function answer_question(d, s, q, t) return nil end";
        assert!(matches!(run(code).unwrap_err(), StageError::Execution(_)));
    }

    #[test]
    fn test_syntax_error_is_code_synthesis() {
        let err = run("function answer_question( oops").unwrap_err();
        assert!(matches!(err, StageError::CodeSynthesis(_)));
    }

    #[test]
    fn test_missing_entry_function_is_code_synthesis() {
        let err = run("local x = 1").unwrap_err();
        assert!(matches!(err, StageError::CodeSynthesis(_)));
        assert!(err.to_string().contains("answer_question"));
    }

    #[test]
    fn test_os_and_io_unavailable() {
        let code = "function answer_question(d, s, q, t) return os.time() end";
        assert!(matches!(run(code).unwrap_err(), StageError::Execution(_)));

        let code = "function answer_question(d, s, q, t) return io.open('/etc/passwd') end";
        assert!(matches!(run(code).unwrap_err(), StageError::Execution(_)));
    }

    #[test]
    fn test_runaway_loop_hits_budget() {
        let code = "function answer_question(d, s, q, t) while true do end end";
        let err = run(code).unwrap_err();
        assert!(matches!(err, StageError::Execution(_)));
        let msg = err.to_string();
        assert!(
            msg.contains("instruction limit") || msg.contains("timeout"),
            "unexpected message: {}",
            msg
        );
    }
}
