//! Core Task type and its field validation.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused after deletion
//! - `priority` is unique across stored tasks between requests
//! - `status` of a non-completed task matches its due date after a refresh

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status;

/// Category used when the caller does not supply one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Largest priority accepted from callers. Shifts may push stored
/// priorities past it, but never anywhere near `i64::MAX`.
pub const MAX_PRIORITY: i64 = i32::MAX as i64;

/// Date format accepted from forms and stored in SQLite.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a task.
///
/// # Properties
/// - Assigned by the store on creation
/// - Immutable once created
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display status of a task.
///
/// # State Machine
/// ```text
/// New <-> Stale   (driven by due date vs. today)
///  \       /
///  Completed      (explicit, never left by a refresh)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Due today or later
    New,
    /// Due date has passed
    Stale,
    /// Marked done by the user
    Completed,
}

impl TaskStatus {
    /// Stable lowercase name, used for storage and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::Stale => "stale",
            TaskStatus::Completed => "completed",
        }
    }

    /// Human-readable label for the views.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::Stale => "Stale",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(TaskStatus::New),
            "stale" => Ok(TaskStatus::Stale),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A tracked to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Ranking key, smaller is more urgent
    pub priority: i64,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub category: String,
}

/// A validated request to create a task.
///
/// # Invariants
/// - `name` is non-empty after trimming
/// - `1 <= priority <= MAX_PRIORITY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: String,
    priority: i64,
    due_date: NaiveDate,
    category: String,
}

impl NewTask {
    /// Validate and build a creation request.
    ///
    /// A missing or blank category falls back to [`DEFAULT_CATEGORY`].
    ///
    /// # Errors
    /// Returns `Err` for an empty name or a priority outside `1..=MAX_PRIORITY`.
    pub fn new(
        name: &str,
        priority: i64,
        due_date: NaiveDate,
        category: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        check_priority(priority)?;
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Ok(Self {
            name: name.to_string(),
            priority,
            due_date,
            category: category.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Materialize the task once the store has assigned an id.
    ///
    /// # Postcondition
    /// `status` is derived from `due_date` vs. `today` and is never `Completed`.
    pub fn into_task(self, id: TaskId, today: NaiveDate) -> Task {
        Task {
            id,
            status: status::derive(self.due_date, TaskStatus::New, today),
            name: self.name,
            priority: self.priority,
            due_date: self.due_date,
            category: self.category,
        }
    }
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.category.is_none()
    }

    /// Check the supplied fields without touching any task.
    ///
    /// # Errors
    /// Returns `Err` for a blank name or a priority outside `1..=MAX_PRIORITY`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name"));
            }
        }
        if let Some(priority) = self.priority {
            check_priority(priority)?;
        }
        Ok(())
    }

    /// Apply every supplied field except `priority`, then re-derive the status.
    ///
    /// Priority changes go through [`super::priority::shift_for_move`] so the
    /// rest of the set can make room.
    pub fn apply_fields(&self, task: &mut Task, today: NaiveDate) {
        if let Some(name) = &self.name {
            task.name = name.trim().to_string();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(category) = &self.category {
            task.category = category.trim().to_string();
        }
        task.status = status::derive(task.due_date, task.status, today);
    }
}

/// Ordering used when listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskOrder {
    /// Priority ascending
    #[default]
    Priority,
    /// Priority ascending, then due date ascending
    PriorityThenDueDate,
}

impl TaskOrder {
    /// Sort a task slice in place. Ties fall back to id for a stable output.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self {
            TaskOrder::Priority => tasks.sort_by_key(|t| (t.priority, t.id)),
            TaskOrder::PriorityThenDueDate => {
                tasks.sort_by_key(|t| (t.priority, t.due_date, t.id))
            }
        }
    }
}

/// Parse a priority field.
///
/// # Errors
/// Returns `Err` if the value is not an integer or is outside `1..=MAX_PRIORITY`.
pub fn parse_priority(raw: &str) -> Result<i64, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPriority(raw.to_string()))?;
    check_priority(value)?;
    Ok(value)
}

fn check_priority(priority: i64) -> Result<(), ValidationError> {
    if priority < 1 {
        return Err(ValidationError::NonPositivePriority(priority));
    }
    if priority > MAX_PRIORITY {
        return Err(ValidationError::PriorityTooLarge(priority));
    }
    Ok(())
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Errors raised while validating task input, before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Priority must be a whole number, got '{0}'")]
    InvalidPriority(String),

    #[error("Priority must be 1 or greater, got {0}")]
    NonPositivePriority(i64),

    #[error("Priority must be at most 2147483647, got {0}")]
    PriorityTooLarge(i64),

    #[error("Due date must be in YYYY-MM-DD format, got '{0}'")]
    InvalidDate(String),

    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_task_defaults_category() {
        let task = NewTask::new("Write report", 1, date(2024, 5, 1), None).unwrap();
        assert_eq!(task.category(), DEFAULT_CATEGORY);

        let task = NewTask::new("Write report", 1, date(2024, 5, 1), Some("  ")).unwrap();
        assert_eq!(task.category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn new_task_rejects_blank_name_and_bad_priority() {
        assert_eq!(
            NewTask::new("   ", 1, date(2024, 5, 1), None),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            NewTask::new("x", 0, date(2024, 5, 1), None),
            Err(ValidationError::NonPositivePriority(0))
        );
        assert_eq!(
            NewTask::new("x", i64::MAX, date(2024, 5, 1), None),
            Err(ValidationError::PriorityTooLarge(i64::MAX))
        );
    }

    #[test]
    fn priority_bounds_are_inclusive() {
        assert_eq!(parse_priority("1"), Ok(1));
        assert_eq!(parse_priority(&MAX_PRIORITY.to_string()), Ok(MAX_PRIORITY));
        assert_eq!(
            parse_priority("9223372036854775807"),
            Err(ValidationError::PriorityTooLarge(i64::MAX))
        );
        assert!(matches!(
            parse_priority("9223372036854775808"),
            Err(ValidationError::InvalidPriority(_))
        ));

        let patch = TaskPatch {
            priority: Some(MAX_PRIORITY + 1),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Err(ValidationError::PriorityTooLarge(MAX_PRIORITY + 1)));
    }

    #[test]
    fn into_task_derives_status_from_due_date() {
        let today = date(2024, 5, 10);
        let past = NewTask::new("a", 1, date(2024, 5, 9), None).unwrap();
        let due_today = NewTask::new("b", 2, today, None).unwrap();

        assert_eq!(past.into_task(TaskId::new(1), today).status, TaskStatus::Stale);
        assert_eq!(due_today.into_task(TaskId::new(2), today).status, TaskStatus::New);
    }

    #[test]
    fn parse_helpers_reject_malformed_input() {
        assert_eq!(parse_priority(" 3 "), Ok(3));
        assert!(matches!(parse_priority("three"), Err(ValidationError::InvalidPriority(_))));
        assert!(matches!(parse_priority("-2"), Err(ValidationError::NonPositivePriority(-2))));
        assert_eq!(parse_due_date("2024-02-29"), Ok(date(2024, 2, 29)));
        assert!(parse_due_date("2023-02-29").is_err());
        assert!(parse_due_date("29.02.2024").is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [TaskStatus::New, TaskStatus::Stale, TaskStatus::Completed] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert_eq!("Completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn patch_keeps_completed_and_rederives_others() {
        let today = date(2024, 5, 10);
        let mut task = Task {
            id: TaskId::new(1),
            name: "a".to_string(),
            priority: 1,
            due_date: date(2024, 5, 20),
            status: TaskStatus::New,
            category: DEFAULT_CATEGORY.to_string(),
        };

        let patch = TaskPatch {
            due_date: Some(date(2024, 5, 1)),
            ..Default::default()
        };
        patch.apply_fields(&mut task, today);
        assert_eq!(task.status, TaskStatus::Stale);

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        patch.apply_fields(&mut task, today);
        assert_eq!(task.status, TaskStatus::Completed);

        // A manually chosen New/Stale is overridden by the due date rule.
        let patch = TaskPatch {
            status: Some(TaskStatus::New),
            ..Default::default()
        };
        patch.apply_fields(&mut task, today);
        assert_eq!(task.status, TaskStatus::Stale);
    }

    #[test]
    fn order_breaks_ties_by_due_date() {
        let mk = |id, priority, due| Task {
            id: TaskId::new(id),
            name: format!("t{id}"),
            priority,
            due_date: due,
            status: TaskStatus::New,
            category: DEFAULT_CATEGORY.to_string(),
        };
        let mut tasks = vec![
            mk(1, 2, date(2024, 1, 5)),
            mk(2, 1, date(2024, 1, 9)),
            mk(3, 2, date(2024, 1, 1)),
        ];
        TaskOrder::PriorityThenDueDate.sort(&mut tasks);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
