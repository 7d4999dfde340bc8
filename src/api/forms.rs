//! Form payloads for the task pages.
//!
//! Every field arrives as an optional string so a bad value produces a
//! form error on the page instead of an extractor rejection. Blank fields
//! count as not supplied.

use serde::{Deserialize, Serialize};

use crate::task::{parse_due_date, parse_priority, NewTask, TaskPatch, TaskStatus, ValidationError};

fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `POST /add` body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AddTaskForm {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub category: Option<String>,
}

impl AddTaskForm {
    pub fn parse(&self) -> Result<NewTask, ValidationError> {
        let name = supplied(&self.name).ok_or(ValidationError::MissingField("name"))?;
        let priority = supplied(&self.priority)
            .ok_or(ValidationError::MissingField("priority"))
            .and_then(parse_priority)?;
        let due_date = supplied(&self.due_date)
            .ok_or(ValidationError::MissingField("due_date"))
            .and_then(parse_due_date)?;
        NewTask::new(name, priority, due_date, supplied(&self.category))
    }
}

/// `POST /edit/{id}` body. Any subset of fields may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditTaskForm {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

impl EditTaskForm {
    pub fn parse(&self) -> Result<TaskPatch, ValidationError> {
        let patch = TaskPatch {
            name: supplied(&self.name).map(str::to_string),
            priority: supplied(&self.priority).map(parse_priority).transpose()?,
            due_date: supplied(&self.due_date).map(parse_due_date).transpose()?,
            status: supplied(&self.status)
                .map(str::parse::<TaskStatus>)
                .transpose()?,
            category: supplied(&self.category).map(str::to_string),
        };
        patch.validate()?;
        Ok(patch)
    }
}
