//! Typed in-memory tabular datasets.
//!
//! A `Dataset` is an ordered sequence of typed columns loaded once and
//! never mutated. The schema renders to the canonical `"name (type)"`
//! form that both prompt templates embed verbatim.

pub mod csv_load;
pub mod dataset;
pub mod registry;
pub mod schema;

pub use csv_load::{load_csv, read_csv, LoadError};
pub use dataset::{Column, ColumnData, ColumnType, Dataset};
pub use registry::DatasetRegistry;
pub use schema::{schema_description, schema_entries};
