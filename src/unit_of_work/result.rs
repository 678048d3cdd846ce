//! Combined output of a committed unit of work.

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

use super::statement::Fetch;
use super::store::Row;

/// Rows produced by one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub name: String,
    pub rows: Vec<Row>,
    fetch: Fetch,
}

impl StepOutput {
    pub(crate) fn new(name: String, rows: Vec<Row>, fetch: Fetch) -> Self {
        Self { name, rows, fetch }
    }

    /// First row for `Fetch::One` steps, every row for `Fetch::All`.
    pub fn to_json(&self) -> Value {
        match self.fetch {
            Fetch::One => self
                .rows
                .first()
                .cloned()
                .map(Value::Object)
                .unwrap_or(Value::Null),
            Fetch::All => Value::Array(self.rows.iter().cloned().map(Value::Object).collect()),
        }
    }
}

/// Outputs of every step, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    outputs: Vec<StepOutput>,
}

impl ExecutionResult {
    pub(crate) fn push(&mut self, output: StepOutput) {
        self.outputs.push(output);
    }

    pub fn get(&self, name: &str) -> Option<&StepOutput> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|output| output.name.as_str())
    }

    /// `{ "<step>": <row or rows>, ... }`
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.outputs
                .iter()
                .map(|output| (output.name.clone(), output.to_json()))
                .collect(),
        )
    }
}

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outputs.len()))?;
        for output in &self.outputs {
            map.serialize_entry(&output.name, &output.to_json())?;
        }
        map.end()
    }
}
