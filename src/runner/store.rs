//! Per-run result storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::condition::FieldLookup;
use crate::steps::ResultRecord;

/// Results of executed steps, keyed by step identifier.
///
/// Re-executing a step (inside a loop, say) overwrites its earlier record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    records: BTreeMap<String, ResultRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, step_id: &str) -> Option<&ResultRecord> {
        self.records.get(step_id)
    }

    pub(crate) fn get_mut(&mut self, step_id: &str) -> Option<&mut ResultRecord> {
        self.records.get_mut(step_id)
    }

    /// Store `record` under `step_id`, replacing any earlier record.
    pub fn insert(&mut self, step_id: impl Into<String>, record: ResultRecord) {
        self.records.insert(step_id.into(), record);
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.records.contains_key(step_id)
    }

    /// Iterate over `(step_id, record)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FieldLookup for ResultStore {
    fn lookup(&self, step: &str, field: &str) -> Option<&Value> {
        self.records.get(step)?.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition;
    use crate::steps::StepOutput;
    use serde_json::json;

    #[test]
    fn insert_replaces_existing_record() {
        let mut store = ResultStore::new();
        store.insert("ask", StepOutput::Input { input: "a".into() }.into_record());
        store.insert("ask", StepOutput::Input { input: "b".into() }.into_record());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ask").unwrap().get("input"), Some(&json!("b")));
    }

    #[test]
    fn lookup_resolves_fields() {
        let mut store = ResultStore::new();
        store.insert(
            "save",
            StepOutput::FileWritten {
                filename: "out.txt".into(),
                success: true,
            }
            .into_record(),
        );

        assert_eq!(store.lookup("save", "success"), Some(&json!(true)));
        assert_eq!(store.lookup("save", "missing"), None);
        assert_eq!(store.lookup("other", "success"), None);
    }

    #[test]
    fn conditions_read_from_store() {
        let mut store = ResultStore::new();
        store.insert("ask", StepOutput::Input { input: "yes".into() }.into_record());

        assert!(condition::evaluate("{ask.input} == 'yes'", &store).unwrap());
        assert!(!condition::evaluate("{gen.code} != None", &store).unwrap());
    }

    #[test]
    fn serializes_as_map_of_records() {
        let mut store = ResultStore::new();
        store.insert("b", ResultRecord::from_error("x"));
        store.insert("a", StepOutput::Input { input: "y".into() }.into_record());

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value, json!({"a": {"input": "y"}, "b": {"error": "x"}}));

        let back: ResultStore = serde_json::from_value(value).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn iter_in_identifier_order() {
        let mut store = ResultStore::new();
        store.insert("z", ResultRecord::new());
        store.insert("a", ResultRecord::new());
        let ids: Vec<&str> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "z"]);
    }
}
