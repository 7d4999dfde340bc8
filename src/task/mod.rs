//! Task module - the task model and the pure scheduling core.
//!
//! Everything in here is free of IO:
//! - `status` derives New/Stale from the due date
//! - `priority` keeps priorities unique when tasks are inserted or moved
//! - `progress` computes the completion percentage and the advice line
//!
//! Storage backends apply these functions inside their own transactions.

pub mod priority;
pub mod progress;
pub mod status;
pub mod task;

pub use progress::{Advice, Summary};
pub use task::{
    parse_due_date, parse_priority, NewTask, Task, TaskId, TaskOrder, TaskPatch, TaskStatus,
    ValidationError, DEFAULT_CATEGORY, MAX_PRIORITY,
};
