//! Column-oriented dataset model.
//!
//! Columns are typed at load time; nulls are `Option`. Datasets are
//! immutable after construction, so everything downstream (schema
//! rendering, prompt building, generated-code execution) reads only.

/// Normalized column type vocabulary.
///
/// The four common types render to fixed names; anything else passes
/// its native name through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    Str,
    Other(String),
}

impl ColumnType {
    pub fn type_name(&self) -> &str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Str => "string",
            ColumnType::Other(name) => name,
        }
    }
}

/// Typed column storage. One vector per column, `None` for nulls.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Bool(Vec<Option<bool>>),
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Str(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Bool(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Str(_) => ColumnType::Str,
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    ty: ColumnType,
    data: ColumnData,
}

impl Column {
    /// Build a column; the declared type is derived from the storage.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let ty = data.column_type();
        Self { name: name.into(), ty, data }
    }

    /// Build a column with an explicit type name (loaders that know a
    /// native type the normalized vocabulary doesn't cover).
    pub fn with_type(name: impl Into<String>, ty: ColumnType, data: ColumnData) -> Self {
        Self { name: name.into(), ty, data }
    }

    pub fn ty(&self) -> &ColumnType {
        &self.ty
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }
}

/// An immutable table: ordered columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Columns in stored order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }
}
