//! Input validation for the form/CLI layer.
//!
//! The store performs no field validation and trusts its inputs; rejection
//! happens here, before `add_task` or `update_task` is ever called.

use crate::classify::parse_when;
use crate::task::{NewTask, TaskPatch};

/// Maximum accepted title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("title too long: at most {MAX_TITLE_LEN} characters"));
    }
    Ok(())
}

fn validate_due(due: &str) -> Result<(), String> {
    // An empty string means "no due date", matching the form's cleared field.
    if due.is_empty() {
        return Ok(());
    }
    if parse_when(due).is_none() {
        return Err(format!(
            "invalid due date '{due}': use ISO-8601, e.g. 2025-08-29T10:00:00Z or 2025-08-29"
        ));
    }
    Ok(())
}

/// Check a creation input before it reaches the store.
pub fn validate_new_task(input: &NewTask) -> Result<(), String> {
    validate_title(&input.title)?;
    if let Some(due) = input.due_date.as_deref() {
        validate_due(due)?;
    }
    Ok(())
}

/// Check an update patch before it reaches the store. Only the fields the
/// patch actually carries are validated.
pub fn validate_patch(patch: &TaskPatch) -> Result<(), String> {
    if let Some(title) = patch.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(due) = patch.due_date.as_deref() {
        validate_due(due)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            ..NewTask::default()
        }
    }

    #[test]
    fn accepts_a_plain_task() {
        assert!(validate_new_task(&titled("Write report")).is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_titles() {
        assert!(validate_new_task(&titled("")).is_err());
        assert!(validate_new_task(&titled("   ")).is_err());
    }

    #[test]
    fn rejects_overlong_titles() {
        assert!(validate_new_task(&titled(&"x".repeat(200))).is_ok());
        assert!(validate_new_task(&titled(&"x".repeat(201))).is_err());
    }

    #[test]
    fn due_date_must_parse_when_present() {
        let mut input = titled("ok");
        input.due_date = Some("2025-08-29T10:00:00Z".into());
        assert!(validate_new_task(&input).is_ok());

        input.due_date = Some("2025-08-29".into());
        assert!(validate_new_task(&input).is_ok());

        input.due_date = Some("tomorrowish".into());
        assert!(validate_new_task(&input).is_err());
    }

    #[test]
    fn empty_due_date_means_no_due_date() {
        let mut input = titled("ok");
        input.due_date = Some(String::new());
        assert!(validate_new_task(&input).is_ok());
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = TaskPatch::new("some-id");
        assert!(validate_patch(&patch).is_ok());

        let patch = TaskPatch {
            title: Some(String::new()),
            ..TaskPatch::new("some-id")
        };
        assert!(validate_patch(&patch).is_err());

        let patch = TaskPatch {
            due_date: Some("not a date".into()),
            ..TaskPatch::new("some-id")
        };
        assert!(validate_patch(&patch).is_err());
    }
}
