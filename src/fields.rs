//! Enumerations and field types for the task dashboard.
//!
//! This module defines the structured vocabulary used to categorise tasks:
//! stored and effective status values, priorities, sort keys, and the
//! presentation view mode.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Stored task status.
///
/// `overdue` is never stored. It is derived at read time from the due date
/// (see the `classify` module); older store files that recorded it literally
/// are read back as `pending` and re-derive overdue-ness from the due date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[serde(alias = "overdue")]
    Pending,
    InProgress,
    Completed,
}

/// Status as seen by filtering, sorting and the dashboard: the stored
/// status widened with the derived `Overdue` state.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EffectiveStatus {
    Overdue,
    InProgress,
    Pending,
    Completed,
}

impl EffectiveStatus {
    /// Sort rank: overdue first, completed last.
    pub fn rank(self) -> u8 {
        match self {
            EffectiveStatus::Overdue => 0,
            EffectiveStatus::InProgress => 1,
            EffectiveStatus::Pending => 2,
            EffectiveStatus::Completed => 3,
        }
    }
}

impl From<Status> for EffectiveStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => EffectiveStatus::Pending,
            Status::InProgress => EffectiveStatus::InProgress,
            Status::Completed => EffectiveStatus::Completed,
        }
    }
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Sort rank: urgent first, low last.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// Available sorting options for the task list.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Status,
    DueDate,
    Customer,
    CreatedAt,
}

/// How the task list is rendered. Persisted as a presentation preference;
/// has no effect on filtering or stats.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Cards,
}

/// Format a stored status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

/// Format an effective status for display.
pub fn format_effective_status(s: EffectiveStatus) -> &'static str {
    match s {
        EffectiveStatus::Overdue => "Overdue",
        EffectiveStatus::InProgress => "In Progress",
        EffectiveStatus::Pending => "Pending",
        EffectiveStatus::Completed => "Completed",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Urgent => "Urgent",
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}
