//! Progress percentage and rule-based advice for the schedule view.

use serde::Serialize;

use super::task::Task;

/// Canned advice, picked by [`advice`]. First matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    /// The task set is empty
    NoTasks,
    /// At least one task sits at priority 1
    StartWithPriorityOne,
    /// More than [`MANY_TASKS`] tasks
    GroupByCategory,
    /// Anything else
    KeepPace,
}

/// Above this many tasks the advice suggests grouping.
pub const MANY_TASKS: usize = 5;

impl Advice {
    pub fn message(&self) -> &'static str {
        match self {
            Advice::NoTasks => "No tasks to analyze.",
            Advice::StartWithPriorityOne => {
                "Start with the highest-priority tasks, those at priority 1."
            }
            Advice::GroupByCategory => {
                "You have quite a few tasks. Try grouping them by category."
            }
            Advice::KeepPace => "Keep up this pace, the balance looks good!",
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Schedule summary.
///
/// # Invariants
/// - `progress_percent <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub progress_percent: u8,
    pub advice: Advice,
}

/// `floor(100 * completed / total)`, or 0 for an empty set.
pub fn progress_percent(tasks: &[Task]) -> u8 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.status.is_completed()).count();
    // completed <= total, so the quotient is at most 100
    u8::try_from(completed * 100 / total).unwrap_or(100)
}

pub fn advice(tasks: &[Task]) -> Advice {
    if tasks.is_empty() {
        Advice::NoTasks
    } else if tasks.iter().any(|t| t.priority == 1) {
        Advice::StartWithPriorityOne
    } else if tasks.len() > MANY_TASKS {
        Advice::GroupByCategory
    } else {
        Advice::KeepPace
    }
}

pub fn summarize(tasks: &[Task]) -> Summary {
    Summary {
        progress_percent: progress_percent(tasks),
        advice: advice(tasks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskId, TaskStatus, DEFAULT_CATEGORY};
    use chrono::NaiveDate;

    fn task(id: i64, priority: i64, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(id),
            name: format!("task {id}"),
            priority,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    #[test]
    fn empty_set_has_zero_progress_and_no_task_advice() {
        let summary = summarize(&[]);
        assert_eq!(summary.progress_percent, 0);
        assert_eq!(summary.advice, Advice::NoTasks);
        assert_eq!(summary.advice.to_string(), "No tasks to analyze.");
    }

    #[test]
    fn progress_is_floored() {
        let tasks = vec![
            task(1, 2, TaskStatus::Completed),
            task(2, 3, TaskStatus::New),
            task(3, 4, TaskStatus::Stale),
        ];
        assert_eq!(progress_percent(&tasks), 33);

        let tasks = vec![
            task(1, 2, TaskStatus::Completed),
            task(2, 3, TaskStatus::Completed),
            task(3, 4, TaskStatus::New),
        ];
        assert_eq!(progress_percent(&tasks), 66);
    }

    #[test]
    fn progress_stays_within_bounds() {
        for total in 1..=12i64 {
            for done in 0..=total {
                let tasks: Vec<Task> = (0..total)
                    .map(|i| {
                        let status = if i < done { TaskStatus::Completed } else { TaskStatus::New };
                        task(i, i + 2, status)
                    })
                    .collect();
                let percent = progress_percent(&tasks);
                assert!(percent <= 100);
                if done == total {
                    assert_eq!(percent, 100);
                }
            }
        }
    }

    #[test]
    fn priority_one_wins_regardless_of_size() {
        let mut tasks: Vec<Task> = (2..12).map(|i| task(i, i, TaskStatus::New)).collect();
        tasks.push(task(1, 1, TaskStatus::Completed));
        assert_eq!(advice(&tasks), Advice::StartWithPriorityOne);
        assert_eq!(advice(&tasks[9..]), Advice::StartWithPriorityOne);
    }

    #[test]
    fn six_tasks_without_priority_one_suggest_grouping() {
        let tasks: Vec<Task> = (2..8).map(|i| task(i, i, TaskStatus::New)).collect();
        assert_eq!(tasks.len(), 6);
        assert_eq!(advice(&tasks), Advice::GroupByCategory);
    }

    #[test]
    fn small_set_without_priority_one_keeps_pace() {
        let tasks: Vec<Task> = (2..7).map(|i| task(i, i, TaskStatus::New)).collect();
        assert_eq!(advice(&tasks), Advice::KeepPace);
    }
}
