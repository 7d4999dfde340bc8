//! Priority slot allocation.
//!
//! Priorities are kept pairwise distinct by shifting every task at or above
//! the requested slot up by exactly one. The shift rewrites O(n) rows, which
//! is fine for a personal task list.
//!
//! # Invariants
//! - Input priorities distinct => output priorities distinct
//! - Tasks below the requested slot are never touched

use super::task::{Task, TaskId};

/// Make room for a new task at `requested`.
///
/// Any integer is accepted here; callers validate that priorities are
/// positive. Returns the ids of the shifted tasks.
///
/// # Postcondition
/// No task holds `requested`, and every task that held `p >= requested`
/// now holds `p + 1`.
pub fn shift_for_insert(tasks: &mut [Task], requested: i64) -> Vec<TaskId> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| tasks[i].priority);

    let mut shifted = Vec::new();
    for i in order {
        let task = &mut tasks[i];
        if task.priority >= requested {
            task.priority += 1;
            shifted.push(task.id);
        }
    }
    shifted
}

/// Move an existing task to `requested`, shifting the others like an insert.
///
/// Returns the ids of every task whose priority changed (the moved task
/// included), or an empty list when `id` is unknown or already at `requested`.
pub fn shift_for_move(tasks: &mut [Task], id: TaskId, requested: i64) -> Vec<TaskId> {
    let Some(pos) = tasks.iter().position(|t| t.id == id) else {
        return Vec::new();
    };
    if tasks[pos].priority == requested {
        return Vec::new();
    }

    tasks.swap(0, pos);
    let (moved, others) = tasks.split_at_mut(1);
    let mut changed = shift_for_insert(others, requested);
    moved[0].priority = requested;
    changed.push(id);
    tasks.swap(0, pos);
    changed
}

/// Whether every priority in the set is distinct.
#[cfg(test)]
pub(crate) fn is_unique(tasks: &[Task]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(tasks.len());
    tasks.iter().all(|t| seen.insert(t.priority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskStatus, DEFAULT_CATEGORY};
    use chrono::NaiveDate;

    fn task(id: i64, priority: i64) -> Task {
        Task {
            id: TaskId::new(id),
            name: format!("task {id}"),
            priority,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: TaskStatus::New,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    fn priorities(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.priority).collect()
    }

    #[test]
    fn insert_in_the_middle_shifts_the_tail() {
        let mut tasks = vec![task(1, 1), task(2, 2), task(3, 3)];

        let shifted = shift_for_insert(&mut tasks, 2);

        assert_eq!(priorities(&tasks), vec![1, 3, 4]);
        assert_eq!(shifted, vec![TaskId::new(2), TaskId::new(3)]);
    }

    #[test]
    fn insert_above_max_shifts_nothing() {
        let mut tasks = vec![task(1, 1), task(2, 5)];

        assert!(shift_for_insert(&mut tasks, 9).is_empty());
        assert_eq!(priorities(&tasks), vec![1, 5]);
    }

    #[test]
    fn insert_below_min_shifts_everything() {
        let mut tasks = vec![task(1, 4), task(2, 7), task(3, 5)];

        let shifted = shift_for_insert(&mut tasks, 1);

        assert_eq!(priorities(&tasks), vec![5, 8, 6]);
        // Reported in ascending priority order.
        assert_eq!(shifted, vec![TaskId::new(1), TaskId::new(3), TaskId::new(2)]);
    }

    #[test]
    fn insert_into_a_gap_still_shifts_higher_slots() {
        let mut tasks = vec![task(1, 1), task(2, 10)];

        shift_for_insert(&mut tasks, 5);

        assert_eq!(priorities(&tasks), vec![1, 11]);
    }

    #[test]
    fn repeated_inserts_keep_priorities_unique() {
        let mut tasks: Vec<Task> = Vec::new();
        for (n, requested) in [3, 1, 1, 2, 7, 2, 4, 1, 9, 3].into_iter().enumerate() {
            shift_for_insert(&mut tasks, requested);
            tasks.push(task(n as i64 + 1, requested));
            assert!(is_unique(&tasks), "duplicate after inserting at {requested}");
        }
    }

    #[test]
    fn move_shifts_others_and_keeps_uniqueness() {
        let mut tasks = vec![task(1, 1), task(2, 2), task(3, 3), task(4, 4)];

        let changed = shift_for_move(&mut tasks, TaskId::new(4), 2);

        assert_eq!(priorities(&tasks), vec![1, 3, 4, 2]);
        assert!(is_unique(&tasks));
        assert_eq!(changed.last(), Some(&TaskId::new(4)));
        assert_eq!(changed.len(), 3);
    }

    #[test]
    fn move_to_current_slot_or_unknown_id_is_noop() {
        let mut tasks = vec![task(1, 1), task(2, 2)];

        assert!(shift_for_move(&mut tasks, TaskId::new(2), 2).is_empty());
        assert!(shift_for_move(&mut tasks, TaskId::new(99), 1).is_empty());
        assert_eq!(priorities(&tasks), vec![1, 2]);
    }

    #[test]
    fn move_down_leaves_lower_slots_alone() {
        let mut tasks = vec![task(1, 1), task(2, 2), task(3, 3)];

        shift_for_move(&mut tasks, TaskId::new(1), 3);

        assert_eq!(priorities(&tasks), vec![3, 2, 4]);
        assert!(is_unique(&tasks));
    }
}
