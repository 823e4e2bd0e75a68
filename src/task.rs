//! Task data structure and its wire representation.
//!
//! This module defines the `Task` record exchanged with the task API, along
//! with the opaque `TaskId` the API assigns on creation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::{Status, DEFAULT_COLOR};

/// Opaque identifier assigned by the task API.
///
/// The API may return ids as strings or numbers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId(id.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => TaskId(s),
            Raw::Int(n) => TaskId(n.to_string()),
            Raw::Float(n) => TaskId(n.to_string()),
        })
    }
}

/// A single to-do item as stored by the task API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Due date as entered in the form, e.g. `2030-01-05T09:30`.
    pub date: String,
    /// Status label; unknown labels are preserved as-is.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_budget")]
    pub budget: f64,
    /// Owner name used to scope a shared task API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Task {
    /// Status of the task, if its label is one of the known values.
    pub fn known_status(&self) -> Option<Status> {
        Status::from_label(&self.status)
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_status() -> String {
    Status::New.label().to_string()
}

/// Accept the budget as a JSON number or a numeric string.
fn deserialize_budget<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("budget is not a number: {s:?}"))),
    }
}
