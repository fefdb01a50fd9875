//! Records and batches.

use crate::errors::{ChatflowError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered group of records processed together by a step.
pub type Batch = Vec<Record>;

/// One unit of data flowing through the steps.
///
/// A record is an ordered mapping of field name to JSON value. Field order is
/// insertion order. Absent fields are reported as `None`; steps that need a
/// field go through [`Record::require`] so the failure names the step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Sets a field, returning the record.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Gets a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Gets a mutable reference to a field.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Sets a field, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Checks if a field exists.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Gets a field the calling step cannot work without.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming `step` and the record index when absent.
    pub fn require(&self, field: &str, step: &str, index: usize) -> Result<&Value> {
        self.fields
            .get(field)
            .ok_or_else(|| ChatflowError::missing_field(step, field, index))
    }

    /// Returns the `messages` field, if present.
    #[must_use]
    pub fn messages(&self) -> Option<&Value> {
        self.get("messages")
    }

    /// Iterates over fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns field names in insertion order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Converts the record into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Record {
    type Error = ChatflowError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
