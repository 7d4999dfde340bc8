//! HTML pages rendered with minijinja.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::external::{Quote, WeatherReport};
use crate::task::{Summary, Task, TaskStatus, DEFAULT_CATEGORY};

use super::forms::AddTaskForm;

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("add_task.html", include_str!("../../templates/add_task.html")),
    ("schedule.html", include_str!("../../templates/schedule.html")),
    ("inspiration.html", include_str!("../../templates/inspiration.html")),
    ("weather.html", include_str!("../../templates/weather.html")),
];

/// A task as the templates see it.
#[derive(Debug, Serialize)]
pub struct TaskView<'a> {
    pub id: i64,
    pub name: &'a str,
    pub priority: i64,
    pub due_date: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub category: &'a str,
}

impl<'a> From<&'a Task> for TaskView<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id.get(),
            name: &task.name,
            priority: task.priority,
            due_date: task.due_date.to_string(),
            status: task.status.as_str(),
            status_label: task.status.label(),
            category: &task.category,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusOption {
    value: &'static str,
    label: &'static str,
}

fn task_views(tasks: &[Task]) -> Vec<TaskView<'_>> {
    tasks.iter().map(TaskView::from).collect()
}

fn status_options() -> Vec<StatusOption> {
    [TaskStatus::New, TaskStatus::Stale, TaskStatus::Completed]
        .into_iter()
        .map(|s| StatusOption {
            value: s.as_str(),
            label: s.label(),
        })
        .collect()
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub fn index(&self, tasks: &[Task]) -> Result<String, minijinja::Error> {
        self.render("index.html", context! { tasks => task_views(tasks) })
    }

    /// Add form plus the editable task list. `form` echoes rejected input.
    pub fn add_task(
        &self,
        tasks: &[Task],
        form: &AddTaskForm,
        error: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.render(
            "add_task.html",
            context! {
                tasks => task_views(tasks),
                form => form,
                error => error,
                statuses => status_options(),
                default_category => DEFAULT_CATEGORY,
            },
        )
    }

    pub fn schedule(&self, tasks: &[Task], summary: &Summary) -> Result<String, minijinja::Error> {
        self.render(
            "schedule.html",
            context! {
                tasks => task_views(tasks),
                progress_percent => summary.progress_percent,
                advice => summary.advice.message(),
            },
        )
    }

    pub fn inspiration(&self, quote: &Quote, tip: &str) -> Result<String, minijinja::Error> {
        self.render("inspiration.html", context! { quote => quote, tip => tip })
    }

    pub fn weather(
        &self,
        city: Option<&str>,
        report: Option<&WeatherReport>,
    ) -> Result<String, minijinja::Error> {
        self.render("weather.html", context! { city => city, weather => report })
    }
}
