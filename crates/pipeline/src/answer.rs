//! Answer values and predicted answer types.
//!
//! Rendering follows the codegen prompt's stated formats: `True` /
//! `False` for booleans, bare numbers with integer-valued floats
//! collapsed, `['a', 'b']` for string lists, `[1, 2.5]` for number
//! lists.

use std::fmt;

/// The five predicted answer shapes the rewrite stage may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerType {
    Bool,
    Category,
    Number,
    ListCategory,
    ListNumber,
}

impl AnswerType {
    /// Lenient parse of the model's predicted-type string.
    pub fn parse(s: &str) -> Option<AnswerType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(AnswerType::Bool),
            "category" | "string" => Some(AnswerType::Category),
            "number" => Some(AnswerType::Number),
            "list[category]" | "list[string]" => Some(AnswerType::ListCategory),
            "list[number]" => Some(AnswerType::ListNumber),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerType::Bool => "bool",
            AnswerType::Category => "category",
            AnswerType::Number => "number",
            AnswerType::ListCategory => "list[category]",
            AnswerType::ListNumber => "list[number]",
        }
    }
}

/// A computed answer, marshalled back from the executed code.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
}

impl Answer {
    /// Shape name for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Answer::Bool(_) => "bool",
            Answer::Int(_) | Answer::Float(_) => "number",
            Answer::Text(_) => "category",
            Answer::TextList(_) => "list[category]",
            Answer::NumberList(_) => "list[number]",
        }
    }

    /// Does this answer's shape satisfy a predicted type?
    ///
    /// Empty lists satisfy either list type.
    pub fn matches(&self, ty: AnswerType) -> bool {
        match (self, ty) {
            (Answer::Bool(_), AnswerType::Bool) => true,
            (Answer::Int(_) | Answer::Float(_), AnswerType::Number) => true,
            (Answer::Text(_), AnswerType::Category) => true,
            (Answer::TextList(_), AnswerType::ListCategory) => true,
            (Answer::NumberList(_), AnswerType::ListNumber) => true,
            (Answer::TextList(v), AnswerType::ListNumber) => v.is_empty(),
            (Answer::NumberList(v), AnswerType::ListCategory) => v.is_empty(),
            _ => false,
        }
    }
}

/// Integer-valued floats print without a fractional part.
fn format_number(n: f64) -> String {
    if n == (n as i64) as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Answer::Int(i) => write!(f, "{}", i),
            Answer::Float(n) => write!(f, "{}", format_number(*n)),
            Answer::Text(s) => write!(f, "{}", s),
            Answer::TextList(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|s| format!("'{}'", s)).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Answer::NumberList(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|n| format_number(*n)).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}
