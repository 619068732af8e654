//! Canonical schema rendering.
//!
//! The `"name (type)"` form below is embedded verbatim in both LLM
//! prompts; changing it changes the contract with the few-shot
//! examples.

use crate::dataset::Dataset;

/// Ordered schema entries, one `"name (type)"` string per column.
///
/// Deterministic: the same dataset always yields the same entries in
/// the same order (column order as stored).
pub fn schema_entries(dataset: &Dataset) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .map(|c| format!("{} ({})", c.name, c.ty().type_name()))
        .collect()
}

/// The comma-separated schema description both prompts embed.
pub fn schema_description(dataset: &Dataset) -> String {
    schema_entries(dataset).join(", ")
}
