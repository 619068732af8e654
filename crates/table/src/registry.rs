//! Read-only dataset registry.
//!
//! The batch driver loads each referenced dataset once and passes the
//! registry into the pipeline. Nothing writes to it after warm-up, so
//! lookups hand out cheap `Arc` clones.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dataset::Dataset;

#[derive(Debug, Default)]
pub struct DatasetRegistry {
    datasets: HashMap<String, Arc<Dataset>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) {
        self.datasets.insert(name.into(), Arc::new(dataset));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Dataset>> {
        self.datasets.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// Registered names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.datasets.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnData};

    #[test]
    fn test_insert_and_get() {
        let mut reg = DatasetRegistry::new();
        reg.insert(
            "001_Forbes",
            Dataset::new(vec![Column::new("rank", ColumnData::Int64(vec![Some(1)]))]),
        );

        assert!(reg.contains("001_Forbes"));
        assert!(!reg.contains("002_Titanic"));
        let ds = reg.get("001_Forbes").unwrap();
        assert_eq!(ds.row_count(), 1);

        // Lookups share the same dataset
        let again = reg.get("001_Forbes").unwrap();
        assert!(Arc::ptr_eq(&ds, &again));
    }

    #[test]
    fn test_names_sorted() {
        let mut reg = DatasetRegistry::new();
        reg.insert("b", Dataset::default());
        reg.insert("a", Dataset::default());
        assert_eq!(reg.names(), vec!["a", "b"]);
        assert_eq!(reg.len(), 2);
    }
}
