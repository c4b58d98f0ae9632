//! The derived-view pipeline: filtering, sorting and dashboard statistics.
//!
//! Pure functions of the task collection plus the current criteria and a
//! single `now` instant. The store re-runs these synchronously after every
//! mutation or criteria change; the cost is O(n log n) per recompute, which
//! is the deliberate choice for interactive collection sizes rather than
//! incremental maintenance.

use chrono::{DateTime, Utc};

use crate::classify::{effective_status, is_approaching_breach, is_due_today, is_overdue, parse_when};
use crate::fields::{EffectiveStatus, Priority, SortKey, Status};
use crate::task::Task;

/// Search, sort and filter criteria for the derived task view.
///
/// Empty filter vectors mean "no filter". These reset each session; only
/// the task collection and presentation preferences are persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub search_query: String,
    pub sort_by: SortKey,
    pub filter_status: Vec<EffectiveStatus>,
    pub filter_priority: Vec<Priority>,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            search_query: String::new(),
            sort_by: SortKey::DueDate,
            filter_status: Vec::new(),
            filter_priority: Vec::new(),
        }
    }
}

/// Dashboard counters, always computed over the entire unfiltered
/// collection. These are global numbers; they deliberately ignore the
/// active search and filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub pending: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub approaching_breach: usize,
    pub total: usize,
}

fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    task.title.to_lowercase().contains(&q)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&q))
        || task
            .customer
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&q))
}

fn passes_filters(task: &Task, criteria: &Criteria, now: DateTime<Utc>) -> bool {
    matches_search(task, &criteria.search_query)
        && (criteria.filter_status.is_empty()
            || criteria.filter_status.contains(&effective_status(task, now)))
        && (criteria.filter_priority.is_empty()
            || criteria.filter_priority.contains(&task.priority))
}

/// Filter then stable-sort the collection into the ordered view.
///
/// Never mutates its input. A task passes when it matches the search query
/// (case-insensitive substring over title, description and customer), its
/// effective status is in the status filter, and its priority is in the
/// priority filter. `Vec::sort_by_key` is stable, so tasks with equal sort
/// keys retain their prior relative order.
pub fn filtered_tasks(tasks: &[Task], criteria: &Criteria, now: DateTime<Utc>) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| passes_filters(t, criteria, now))
        .cloned()
        .collect();

    match criteria.sort_by {
        SortKey::Priority => out.sort_by_key(|t| t.priority.rank()),
        SortKey::Status => out.sort_by_key(|t| effective_status(t, now).rank()),
        SortKey::DueDate => {
            // Tasks without a parseable due date sort after all dated ones.
            out.sort_by_key(|t| {
                t.due_date
                    .as_deref()
                    .and_then(parse_when)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            });
        }
        SortKey::Customer => {
            // Case-folded ordering; absent customer counts as empty string.
            out.sort_by_key(|t| t.customer.as_deref().unwrap_or("").to_lowercase());
        }
        SortKey::CreatedAt => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    out
}

/// Aggregate the dashboard counters over the full collection.
pub fn task_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    TaskStats {
        pending: tasks.iter().filter(|t| t.status == Status::Pending).count(),
        overdue: tasks.iter().filter(|t| is_overdue(t, now)).count(),
        due_today: tasks
            .iter()
            .filter(|t| {
                t.status != Status::Completed
                    && t.due_date.as_deref().is_some_and(|d| is_due_today(d, now))
            })
            .count(),
        approaching_breach: tasks
            .iter()
            .filter(|t| is_approaching_breach(t, now))
            .count(),
        total: tasks.len(),
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 28, 12, 0, 0).unwrap()
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Pending),
            Just(Status::InProgress),
            Just(Status::Completed),
        ]
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
            Just(Priority::Urgent),
        ]
    }

    fn arb_effective_status() -> impl Strategy<Value = EffectiveStatus> {
        prop_oneof![
            Just(EffectiveStatus::Overdue),
            Just(EffectiveStatus::InProgress),
            Just(EffectiveStatus::Pending),
            Just(EffectiveStatus::Completed),
        ]
    }

    fn arb_sort_key() -> impl Strategy<Value = SortKey> {
        prop_oneof![
            Just(SortKey::Priority),
            Just(SortKey::Status),
            Just(SortKey::DueDate),
            Just(SortKey::Customer),
            Just(SortKey::CreatedAt),
        ]
    }

    prop_compose! {
        fn arb_task()(
            title in "[a-z]{0,10}",
            description in proptest::option::of("[a-z ]{0,16}"),
            customer in proptest::option::of("[a-z]{0,6}"),
            due_hours in proptest::option::of(-200i64..200),
            created_minutes in 0i64..10_000,
            status in arb_status(),
            priority in arb_priority(),
        ) -> Task {
            let now = fixed_now();
            Task {
                id: String::new(), // reassigned per-index by the test
                title,
                description,
                due_date: due_hours.map(|h| (now + Duration::hours(h)).to_rfc3339()),
                status,
                priority,
                customer,
                created_at: now - Duration::minutes(created_minutes),
                updated_at: now,
            }
        }
    }

    proptest! {
        /// A task appears in the output iff it independently passes the
        /// search, status and priority predicates.
        #[test]
        fn filter_is_a_conjunction_of_predicates(
            mut tasks in proptest::collection::vec(arb_task(), 0..24),
            query in "[a-z]{0,2}",
            filter_status in proptest::collection::vec(arb_effective_status(), 0..3),
            filter_priority in proptest::collection::vec(arb_priority(), 0..3),
            sort_by in arb_sort_key(),
        ) {
            for (i, t) in tasks.iter_mut().enumerate() {
                t.id = format!("t{i}");
            }
            let now = fixed_now();
            let crit = Criteria {
                search_query: query.clone(),
                sort_by,
                filter_status: filter_status.clone(),
                filter_priority: filter_priority.clone(),
            };
            let out = filtered_tasks(&tasks, &crit, now);

            for t in &tasks {
                // Generated text is already lowercase, so a plain substring
                // check mirrors the case-insensitive match.
                let search_hit = query.is_empty()
                    || t.title.contains(&query)
                    || t.description.as_deref().is_some_and(|d| d.contains(&query))
                    || t.customer.as_deref().is_some_and(|c| c.contains(&query));
                let status_hit = filter_status.is_empty()
                    || filter_status.contains(&effective_status(t, now));
                let priority_hit =
                    filter_priority.is_empty() || filter_priority.contains(&t.priority);
                let expected = search_hit && status_hit && priority_hit;

                let present = out.iter().any(|o| o.id == t.id);
                prop_assert_eq!(present, expected, "task {} membership", t.id);
            }
        }

        /// Tasks with equal sort keys keep their input order (stable sort),
        /// checked via the coarse priority and status rankings.
        #[test]
        fn sorting_is_stable_under_equal_keys(
            mut tasks in proptest::collection::vec(arb_task(), 0..24),
            by_status in proptest::bool::ANY,
        ) {
            for (i, t) in tasks.iter_mut().enumerate() {
                t.id = format!("t{i}");
            }
            let now = fixed_now();
            let crit = Criteria {
                sort_by: if by_status { SortKey::Status } else { SortKey::Priority },
                ..Criteria::default()
            };
            let out = filtered_tasks(&tasks, &crit, now);

            let input_index = |id: &str| tasks.iter().position(|t| t.id == id).unwrap();
            for pair in out.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let (ka, kb) = if by_status {
                    (effective_status(a, now).rank(), effective_status(b, now).rank())
                } else {
                    (a.priority.rank(), b.priority.rank())
                };
                prop_assert!(ka <= kb, "output must be ordered by rank");
                if ka == kb {
                    prop_assert!(
                        input_index(&a.id) < input_index(&b.id),
                        "equal keys must retain input order"
                    );
                }
            }
        }

        /// Running the pipeline twice with identical arguments yields
        /// identical output.
        #[test]
        fn pipeline_is_idempotent(
            mut tasks in proptest::collection::vec(arb_task(), 0..24),
            sort_by in arb_sort_key(),
        ) {
            for (i, t) in tasks.iter_mut().enumerate() {
                t.id = format!("t{i}");
            }
            let crit = Criteria { sort_by, ..Criteria::default() };
            let first = filtered_tasks(&tasks, &crit, fixed_now());
            let second = filtered_tasks(&tasks, &crit, fixed_now());
            prop_assert_eq!(first, second);
        }

        /// `total` always equals the collection size, whatever else the
        /// tasks look like.
        #[test]
        fn stats_total_is_collection_size(
            tasks in proptest::collection::vec(arb_task(), 0..24),
        ) {
            let stats = task_stats(&tasks, fixed_now());
            prop_assert_eq!(stats.total, tasks.len());
        }
    }
}
