//! Date-relative classification predicates.
//!
//! Pure functions over a task and an explicit `now` instant. The store
//! fetches `now` once per recompute pass and passes it down, so every
//! predicate in a pass agrees on the current time. A malformed due-date
//! string classifies as "no due date"; it never propagates an error into
//! the query pipeline.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

use crate::fields::{EffectiveStatus, Status};
use crate::task::Task;

/// Parse an ISO-8601 timestamp, accepting a bare `YYYY-MM-DD` date as
/// midnight UTC. Returns `None` for anything unparseable.
pub fn parse_when(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn parsed_due(task: &Task) -> Option<DateTime<Utc>> {
    task.due_date.as_deref().and_then(parse_when)
}

/// A task is overdue when its due date lies in the past and it is not
/// completed. Completed tasks are never overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    if task.status == Status::Completed {
        return false;
    }
    match parsed_due(task) {
        Some(due) => due < now,
        None => false,
    }
}

/// A task is approaching breach when it is not completed and its due date
/// falls within the next 48 hours (exclusive of already-due tasks,
/// inclusive of the 48-hour boundary).
pub fn is_approaching_breach(task: &Task, now: DateTime<Utc>) -> bool {
    if task.status == Status::Completed {
        return false;
    }
    let Some(due) = parsed_due(task) else {
        return false;
    };
    let hours_until = (due - now).num_seconds() as f64 / 3600.0;
    hours_until > 0.0 && hours_until <= 48.0
}

/// True when the due date falls on the same calendar day as `now`, both
/// viewed in the local time zone.
pub fn is_due_today(due_date: &str, now: DateTime<Utc>) -> bool {
    match parse_when(due_date) {
        Some(due) => {
            due.with_timezone(&Local).date_naive() == now.with_timezone(&Local).date_naive()
        }
        None => false,
    }
}

/// The status used for filtering, sorting and the dashboard: `Overdue`
/// when the due date has passed, otherwise the stored status.
pub fn effective_status(task: &Task, now: DateTime<Utc>) -> EffectiveStatus {
    if is_overdue(task, now) {
        EffectiveStatus::Overdue
    } else {
        task.status.into()
    }
}
