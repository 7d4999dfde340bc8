//! Status derivation from due dates.
//!
//! # Invariants
//! - After [`refresh`], every non-completed task is `New` iff `due_date >= today`
//! - `Completed` is never changed by a refresh
//! - [`refresh`] is idempotent for a fixed `today`

use chrono::NaiveDate;

use super::task::{Task, TaskId, TaskStatus};

/// Status a task should have on `today`.
pub fn derive(due_date: NaiveDate, current: TaskStatus, today: NaiveDate) -> TaskStatus {
    match current {
        TaskStatus::Completed => TaskStatus::Completed,
        _ if due_date < today => TaskStatus::Stale,
        _ => TaskStatus::New,
    }
}

/// Re-derive the status of every task in place.
///
/// Returns the ids of the tasks whose status changed; an empty result means
/// the set was already consistent and nothing needs persisting.
pub fn refresh(tasks: &mut [Task], today: NaiveDate) -> Vec<TaskId> {
    let mut changed = Vec::new();
    for task in tasks.iter_mut() {
        let next = derive(task.due_date, task.status, today);
        if next != task.status {
            task.status = next;
            changed.push(task.id);
        }
    }
    changed
}
