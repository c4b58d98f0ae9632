//! Task data structure and the input shapes for creating and editing tasks.
//!
//! This module defines the core `Task` record plus `NewTask` and `TaskPatch`,
//! the shapes the form/CLI layer hands to the store after validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A customer work item with due-date and priority metadata.
///
/// Identity is the opaque `id` string, assigned at creation and immutable.
/// The due date is kept as the raw ISO-8601 string it arrived with: an
/// unparseable value degrades to "no due date" during classification rather
/// than breaking stats or filtering for every other task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub customer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. Status and priority default to pending and
/// medium when unset; id and timestamps are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub customer: Option<String>,
}

/// Partial update for an existing task, located by `id`.
///
/// `None` fields are left untouched; the `clear_*` flags explicitly empty
/// an optional field, mirroring the edit form's "remove value" controls.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub due_date: Option<String>,
    pub clear_due: bool,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub customer: Option<String>,
    pub clear_customer: bool,
}

impl TaskPatch {
    /// An empty patch for the given task id.
    pub fn new(id: impl Into<String>) -> Self {
        TaskPatch {
            id: id.into(),
            ..TaskPatch::default()
        }
    }
}
