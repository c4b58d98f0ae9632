//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers that implement the
//! subcommands: CRUD operations on tasks, the filtered/sorted listing, the
//! dashboard counters, and the persisted presentation preferences.

use std::io;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::classify::{effective_status, parse_when};
use crate::cli::Cli;
use crate::fields::*;
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskPatch};
use crate::validate::{validate_new_task, validate_patch};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date as ISO-8601: 2025-08-29T10:00:00Z or 2025-08-29.
        #[arg(long)]
        due: Option<String>,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Status: pending | in-progress | completed.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Customer the task belongs to.
        #[arg(long)]
        customer: Option<String>,
    },

    /// List tasks with optional search, filters and sorting.
    List {
        /// Case-insensitive search over title, description and customer.
        #[arg(long)]
        search: Option<String>,
        /// Filter by effective status (overdue is derived). May be repeated.
        #[arg(long = "status", value_enum)]
        status: Vec<EffectiveStatus>,
        /// Filter by priority. May be repeated.
        #[arg(long = "priority", value_enum)]
        priority: Vec<Priority>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::DueDate)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id, id prefix, or title.
    View {
        /// Task id (or unique prefix) or title.
        id: String,
    },

    /// Update fields of an existing task.
    Update {
        /// Task id (or unique prefix) or title.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        desc: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_desc: bool,
        /// New due date as ISO-8601.
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        /// New priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// New stored status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// New customer.
        #[arg(long)]
        customer: Option<String>,
        /// Remove the customer.
        #[arg(long)]
        clear_customer: bool,
    },

    /// Delete a task.
    Delete {
        /// Task id (or unique prefix) or title.
        id: String,
    },

    /// Cycle a task's stored status: pending -> in-progress -> completed -> pending.
    Toggle {
        /// Task id (or unique prefix) or title.
        id: String,
    },

    /// Show the dashboard counters.
    Stats,

    /// Set the persisted list rendering mode.
    Mode {
        /// Rendering mode: list | cards.
        #[arg(value_enum)]
        mode: ViewMode,
    },

    /// Toggle the persisted sidebar preference.
    Sidebar,

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a task identifier (id, unique id prefix, or title) to a full id.
/// Returns an error when nothing matches or the match is ambiguous.
pub fn resolve_task(store: &TaskStore, identifier: &str) -> Result<String, String> {
    if let Some(t) = store.tasks().iter().find(|t| t.id == identifier) {
        return Ok(t.id.clone());
    }

    let prefix_matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(identifier))
        .collect();
    match prefix_matches.len() {
        1 => return Ok(prefix_matches[0].id.clone()),
        n if n > 1 => {
            return Err(format!(
                "Id prefix '{identifier}' is ambiguous ({n} matches). Use more characters."
            ))
        }
        _ => {}
    }

    let title_matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.title.to_lowercase() == identifier.to_lowercase())
        .collect();
    match title_matches.len() {
        0 => Err(format!("No task found matching '{identifier}'")),
        1 => Ok(title_matches[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple tasks titled '{identifier}':\n");
            for t in title_matches {
                msg.push_str(&format!("  {}: {}\n", short_id(&t.id), t.title));
            }
            msg.push_str("Please use the specific id instead.");
            Err(msg)
        }
    }
}

/// First eight characters of an id, enough to be unique in practice.
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}

/// Format a due date relative to now ("today", "in 3d", "2d late").
pub fn format_due_relative(due: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(due) = due.and_then(parse_when) else {
        return "-".into();
    };
    let days = (due.with_timezone(&Local).date_naive() - now.with_timezone(&Local).date_naive())
        .num_days();
    if days == 0 {
        "today".into()
    } else if days == 1 {
        "tomorrow".into()
    } else if days > 1 {
        format!("in {days}d")
    } else {
        format!("{}d late", -days)
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[Task], now: DateTime<Utc>) {
    println!(
        "{:<10} {:<12} {:<8} {:<10} {:<16} {}",
        "ID", "Status", "Pri", "Due", "Customer", "Title"
    );
    for t in tasks {
        let customer = t.customer.clone().unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<12} {:<8} {:<10} {:<16} {}",
            short_id(&t.id),
            format_effective_status(effective_status(t, now)),
            format_priority(t.priority),
            format_due_relative(t.due_date.as_deref(), now),
            truncate(&customer, 16),
            t.title
        );
    }
}

/// Print tasks as card blocks, one per task.
fn print_cards(tasks: &[Task], now: DateTime<Utc>) {
    for t in tasks {
        println!("{} [{}]", t.title, format_priority(t.priority));
        println!(
            "    {} | due {} | {}",
            format_effective_status(effective_status(t, now)),
            format_due_relative(t.due_date.as_deref(), now),
            t.customer.as_deref().unwrap_or("-")
        );
        if let Some(desc) = t.description.as_deref() {
            println!("    {}", truncate(desc, 72));
        }
        println!("    id {}", short_id(&t.id));
        println!();
    }
}

fn save_or_exit(store: &TaskStore, db_path: &Path) {
    if let Err(e) = store.snapshot().save(db_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(
    store: &mut TaskStore,
    db_path: &Path,
    title: String,
    desc: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    customer: Option<String>,
) {
    let input = NewTask {
        title,
        description: desc,
        due_date: due,
        status,
        priority,
        customer,
    };
    if let Err(e) = validate_new_task(&input) {
        eprintln!("Invalid task: {e}");
        std::process::exit(1);
    }
    let id = store.add_task(input);
    save_or_exit(store, db_path);
    println!("Added task {}", short_id(&id));
}

/// List tasks through the store's derived view.
pub fn cmd_list(
    store: &mut TaskStore,
    search: Option<String>,
    status: Vec<EffectiveStatus>,
    priority: Vec<Priority>,
    sort: SortKey,
    limit: Option<usize>,
) {
    if let Some(q) = search {
        store.set_search_query(q);
    }
    store.set_sort_by(sort);
    store.set_filter_status(status);
    store.set_filter_priority(priority);

    let now = Utc::now();
    let mut tasks: Vec<Task> = store.filtered_tasks().to_vec();
    if let Some(n) = limit {
        tasks.truncate(n);
    }
    match store.view_mode() {
        ViewMode::List => print_table(&tasks, now),
        ViewMode::Cards => print_cards(&tasks, now),
    }
}

/// View detailed information about a single task.
pub fn cmd_view(store: &TaskStore, id: String) {
    let task_id = match resolve_task(store, &id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {e}");
            std::process::exit(1);
        }
    };
    let Some(task) = store.tasks().iter().find(|t| t.id == task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };

    let now = Utc::now();
    println!("Id:        {}", task.id);
    println!("Title:     {}", task.title);
    println!("Status:    {}", format_status(task.status));
    println!(
        "Effective: {}",
        format_effective_status(effective_status(task, now))
    );
    println!("Priority:  {}", format_priority(task.priority));
    println!(
        "Due:       {}",
        match task.due_date.as_deref() {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), now)),
            None => "-".into(),
        }
    );
    println!(
        "Customer:  {}",
        task.customer.clone().unwrap_or_else(|| "-".into())
    );
    println!("Created:   {}", task.created_at.to_rfc3339());
    println!("Updated:   {}", task.updated_at.to_rfc3339());
    println!(
        "Description:\n{}",
        task.description.clone().unwrap_or_else(|| "-".into())
    );
}

/// Update an existing task's fields.
pub fn cmd_update(
    store: &mut TaskStore,
    db_path: &Path,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    clear_desc: bool,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
    status: Option<Status>,
    customer: Option<String>,
    clear_customer: bool,
) {
    let task_id = match resolve_task(store, &id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {e}");
            std::process::exit(1);
        }
    };
    let patch = TaskPatch {
        id: task_id.clone(),
        title,
        description: desc,
        clear_description: clear_desc,
        due_date: due,
        clear_due,
        status,
        priority,
        customer,
        clear_customer,
    };
    if let Err(e) = validate_patch(&patch) {
        eprintln!("Invalid update: {e}");
        std::process::exit(1);
    }
    store.update_task(patch);
    save_or_exit(store, db_path);
    println!("Updated task {}", short_id(&task_id));
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, db_path: &Path, id: String) {
    let task_id = match resolve_task(store, &id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {e}");
            std::process::exit(1);
        }
    };
    store.delete_task(&task_id);
    save_or_exit(store, db_path);
    println!("Deleted task {}", short_id(&task_id));
}

/// Cycle a task's stored status.
pub fn cmd_toggle(store: &mut TaskStore, db_path: &Path, id: String) {
    let task_id = match resolve_task(store, &id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {e}");
            std::process::exit(1);
        }
    };
    let before = store
        .tasks()
        .iter()
        .find(|t| t.id == task_id)
        .map(|t| t.status);
    store.toggle_task_status(&task_id);
    let after = store
        .tasks()
        .iter()
        .find(|t| t.id == task_id)
        .map(|t| t.status);
    save_or_exit(store, db_path);
    if let (Some(before), Some(after)) = (before, after) {
        println!(
            "Task {}: {} -> {}",
            short_id(&task_id),
            format_status(before),
            format_status(after)
        );
    }
}

/// Print the dashboard counters.
pub fn cmd_stats(store: &TaskStore) {
    let stats = store.stats();
    println!("Total:               {}", stats.total);
    println!("Pending:             {}", stats.pending);
    println!("Overdue:             {}", stats.overdue);
    println!("Due today:           {}", stats.due_today);
    println!("Approaching breach:  {}", stats.approaching_breach);
}

/// Persist the list rendering mode.
pub fn cmd_mode(store: &mut TaskStore, db_path: &Path, mode: ViewMode) {
    store.set_view_mode(mode);
    save_or_exit(store, db_path);
    println!(
        "View mode set to {}",
        match mode {
            ViewMode::List => "list",
            ViewMode::Cards => "cards",
        }
    );
}

/// Toggle the persisted sidebar preference.
pub fn cmd_sidebar(store: &mut TaskStore, db_path: &Path) {
    store.toggle_sidebar();
    save_or_exit(store, db_path);
    println!(
        "Sidebar {}",
        if store.sidebar_open() { "open" } else { "closed" }
    );
}

/// Emit completion definitions for the given shell.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "td", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::clock::FixedClock;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 28, 12, 0, 0).unwrap()
    }

    fn store_with(titles: &[&str]) -> TaskStore {
        let mut store = TaskStore::with_clock(Box::new(FixedClock(fixed_now())));
        for t in titles {
            store.add_task(NewTask {
                title: (*t).into(),
                ..NewTask::default()
            });
        }
        store
    }

    #[test]
    fn resolver_finds_by_exact_id_and_prefix() {
        let store = store_with(&["alpha"]);
        let id = store.tasks()[0].id.clone();
        assert_eq!(resolve_task(&store, &id).unwrap(), id);
        assert_eq!(resolve_task(&store, &id[..8]).unwrap(), id);
    }

    #[test]
    fn resolver_finds_by_title_case_insensitively() {
        let store = store_with(&["Quarterly Report"]);
        let id = store.tasks()[0].id.clone();
        assert_eq!(resolve_task(&store, "quarterly report").unwrap(), id);
    }

    #[test]
    fn resolver_rejects_unknown_and_ambiguous() {
        let store = store_with(&["same title", "same title"]);
        assert!(resolve_task(&store, "nothing like this").is_err());
        assert!(resolve_task(&store, "same title").is_err());
    }

    #[test]
    fn relative_due_formatting() {
        let now = fixed_now();
        assert_eq!(format_due_relative(None, now), "-");
        assert_eq!(format_due_relative(Some("garbage"), now), "-");

        let today = now.to_rfc3339();
        assert_eq!(format_due_relative(Some(today.as_str()), now), "today");
        let ahead = (now + Duration::days(3)).to_rfc3339();
        assert_eq!(format_due_relative(Some(ahead.as_str()), now), "in 3d");
        let late = (now - Duration::days(2)).to_rfc3339();
        assert_eq!(format_due_relative(Some(late.as_str()), now), "2d late");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }
}
