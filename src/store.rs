//! The task store: single source of truth for the task collection and the
//! view criteria, plus the two derived views computed from them.
//!
//! Every mutation and every criteria change writes the canonical state and
//! immediately re-runs the query pipeline and stats aggregator, replacing
//! `filtered` and `stats` before the call returns. Consumers read the
//! derived views through the accessors and never compute filtering or
//! sorting themselves. Recomputation is O(n log n) per mutation; for
//! interactive collection sizes this beats the complexity of incremental
//! maintenance.

use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::db::StoreFile;
use crate::fields::{EffectiveStatus, Priority, SortKey, Status, ViewMode};
use crate::query::{filtered_tasks, task_stats, Criteria, TaskStats};
use crate::task::{NewTask, Task, TaskPatch};

/// State owner for one dashboard session.
///
/// Instantiated once per application run (or per test); all mutation is
/// routed through its methods. Single-threaded by design: every operation
/// completes, recompute included, before the next one starts.
pub struct TaskStore {
    tasks: Vec<Task>,
    criteria: Criteria,
    view_mode: ViewMode,
    sidebar_open: bool,
    filtered: Vec<Task>,
    stats: TaskStats,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    /// An empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// An empty store on the given clock. Tests pass a fixed clock to
    /// freeze classification outcomes.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let mut store = TaskStore {
            tasks: Vec::new(),
            criteria: Criteria::default(),
            view_mode: ViewMode::default(),
            sidebar_open: false,
            filtered: Vec::new(),
            stats: TaskStats::default(),
            clock,
        };
        store.recompute();
        store
    }

    /// Rebuild a store from a persisted snapshot. Criteria are not
    /// persisted and start fresh; one recompute runs after the restore.
    pub fn restore(file: StoreFile) -> Self {
        Self::restore_with_clock(file, Box::new(SystemClock))
    }

    /// `restore` with an explicit clock.
    pub fn restore_with_clock(file: StoreFile, clock: Box<dyn Clock>) -> Self {
        let mut store = TaskStore {
            tasks: file.tasks,
            criteria: Criteria::default(),
            view_mode: file.view_mode,
            sidebar_open: file.sidebar_open,
            filtered: Vec::new(),
            stats: TaskStats::default(),
            clock,
        };
        store.recompute();
        store
    }

    /// The persistable subset of the state: tasks plus presentation
    /// preferences. Search, sort and filters reset each session.
    pub fn snapshot(&self) -> StoreFile {
        StoreFile {
            tasks: self.tasks.clone(),
            view_mode: self.view_mode,
            sidebar_open: self.sidebar_open,
        }
    }

    // One instant per pass: the filtered list and the stats of a single
    // recompute always agree on what "now" means.
    fn recompute(&mut self) {
        let now = self.clock.now();
        self.filtered = filtered_tasks(&self.tasks, &self.criteria, now);
        self.stats = task_stats(&self.tasks, now);
    }

    /// Append a new task and return its freshly assigned id.
    ///
    /// Performs no validation; the form/CLI layer runs `validate` first
    /// and the store trusts what it is given.
    pub fn add_task(&mut self, input: NewTask) -> String {
        let now = self.clock.now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: input.status.unwrap_or(Status::Pending),
            priority: input.priority.unwrap_or(Priority::Medium),
            customer: input.customer,
            created_at: now,
            updated_at: now,
        };
        let id = task.id.clone();
        self.tasks.push(task);
        self.recompute();
        id
    }

    /// Merge the patch over the task with the matching id and bump its
    /// `updated_at`. An unknown id is a silent no-op (the UI may race a
    /// stale reference against a delete); recompute still runs.
    pub fn update_task(&mut self, patch: TaskPatch) {
        let now = self.clock.now();
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == patch.id) {
            if let Some(title) = patch.title {
                task.title = title;
            }
            if patch.clear_description {
                task.description = None;
            }
            if let Some(description) = patch.description {
                task.description = Some(description);
            }
            if patch.clear_due {
                task.due_date = None;
            }
            if let Some(due) = patch.due_date {
                task.due_date = Some(due);
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if patch.clear_customer {
                task.customer = None;
            }
            if let Some(customer) = patch.customer {
                task.customer = Some(customer);
            }
            task.updated_at = now;
        }
        self.recompute();
    }

    /// Remove the task with the matching id if present; no-op otherwise.
    pub fn delete_task(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
        self.recompute();
    }

    /// Cycle the stored status: completed -> pending -> in_progress ->
    /// completed. The cycle never passes through overdue, which is derived
    /// rather than stored. Unknown ids are ignored.
    pub fn toggle_task_status(&mut self, id: &str) {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return;
        };
        let next = match task.status {
            Status::Completed => Status::Pending,
            Status::Pending => Status::InProgress,
            Status::InProgress => Status::Completed,
        };
        self.update_task(TaskPatch {
            status: Some(next),
            ..TaskPatch::new(id)
        });
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.criteria.search_query = query.into();
        self.recompute();
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.criteria.sort_by = sort_by;
        self.recompute();
    }

    pub fn set_filter_status(&mut self, statuses: Vec<EffectiveStatus>) {
        self.criteria.filter_status = statuses;
        self.recompute();
    }

    pub fn set_filter_priority(&mut self, priorities: Vec<Priority>) {
        self.criteria.filter_priority = priorities;
        self.recompute();
    }

    /// Reset both filters and the search query in one step, with a single
    /// recompute rather than three.
    pub fn clear_filters(&mut self) {
        self.criteria.search_query.clear();
        self.criteria.filter_status.clear();
        self.criteria.filter_priority.clear();
        self.recompute();
    }

    /// Presentation preference only; the derived views do not depend on it.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Presentation preference only; the derived views do not depend on it.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// The full canonical collection, unfiltered and unsorted.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The derived view: filtered and sorted per the current criteria.
    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered
    }

    /// The derived dashboard counters, over the full collection.
    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    pub fn search_query(&self) -> &str {
        &self.criteria.search_query
    }

    pub fn sort_by(&self) -> SortKey {
        self.criteria.sort_by
    }

    pub fn filter_status(&self) -> &[EffectiveStatus] {
        &self.criteria.filter_status
    }

    pub fn filter_priority(&self) -> &[Priority] {
        &self.criteria.filter_priority
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
