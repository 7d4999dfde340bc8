//! Task pages: list, add, edit, complete, delete and the schedule.
//!
//! Every handler first refreshes statuses against today's date so no
//! response shows a status that is out of date.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};

use crate::task::{progress, TaskId, TaskOrder, ValidationError};
use crate::util::internal_error;

use super::forms::{AddTaskForm, EditTaskForm};
use super::routes::AppState;

type HandlerResult<T> = Result<T, (StatusCode, String)>;

/// Create the task page routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_page).post(add_task))
        .route("/edit/:id", post(edit_task))
        .route("/delete/:id", post(delete_task))
        .route("/complete/:id", post(complete_task))
        .route("/schedule", get(schedule))
}

async fn refresh(state: &AppState) -> HandlerResult<()> {
    let today = state.clock.today();
    state
        .store
        .refresh_statuses(today)
        .await
        .map_err(internal_error)?;
    Ok(())
}

/// Render the add page with a form error and HTTP 400.
async fn reject(state: &AppState, form: &AddTaskForm, error: &ValidationError) -> HandlerResult<Response> {
    tracing::debug!("Rejected task form: {}", error);
    let tasks = state
        .store
        .list_tasks(TaskOrder::Priority)
        .await
        .map_err(internal_error)?;
    let body = state
        .views
        .add_task(&tasks, form, Some(&error.to_string()))
        .map_err(internal_error)?;
    Ok((StatusCode::BAD_REQUEST, Html(body)).into_response())
}

/// GET /
async fn index(State(state): State<Arc<AppState>>) -> HandlerResult<Html<String>> {
    refresh(&state).await?;
    let tasks = state
        .store
        .list_tasks(TaskOrder::Priority)
        .await
        .map_err(internal_error)?;
    let body = state.views.index(&tasks).map_err(internal_error)?;
    Ok(Html(body))
}

/// GET /add
async fn add_page(State(state): State<Arc<AppState>>) -> HandlerResult<Html<String>> {
    refresh(&state).await?;
    let tasks = state
        .store
        .list_tasks(TaskOrder::Priority)
        .await
        .map_err(internal_error)?;
    let body = state
        .views
        .add_task(&tasks, &AddTaskForm::default(), None)
        .map_err(internal_error)?;
    Ok(Html(body))
}

/// POST /add
async fn add_task(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddTaskForm>,
) -> HandlerResult<Response> {
    refresh(&state).await?;
    let new_task = match form.parse() {
        Ok(task) => task,
        Err(e) => return reject(&state, &form, &e).await,
    };

    let task = state
        .store
        .create_task(new_task, state.clock.today())
        .await
        .map_err(internal_error)?;
    tracing::info!("Added task {} '{}' at priority {}", task.id, task.name, task.priority);
    Ok(Redirect::to("/add").into_response())
}

/// POST /edit/{id}
async fn edit_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<EditTaskForm>,
) -> HandlerResult<Response> {
    refresh(&state).await?;
    let patch = match form.parse() {
        Ok(patch) => patch,
        Err(e) => return reject(&state, &AddTaskForm::default(), &e).await,
    };

    let id = TaskId::new(id);
    if patch.is_empty() {
        tracing::debug!("Edit of task {} supplied no fields", id);
        return Ok(Redirect::to("/add").into_response());
    }
    match state
        .store
        .update_task(id, patch, state.clock.today())
        .await
        .map_err(internal_error)?
    {
        Some(task) => tracing::info!("Edited task {} (status {})", task.id, task.status),
        None => tracing::debug!("Edit ignored: task {} not found", id),
    }
    Ok(Redirect::to("/add").into_response())
}

/// POST /delete/{id}
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> HandlerResult<Redirect> {
    refresh(&state).await?;
    let id = TaskId::new(id);
    if state.store.delete_task(id).await.map_err(internal_error)? {
        tracing::info!("Deleted task {}", id);
    } else {
        tracing::debug!("Delete ignored: task {} not found", id);
    }
    Ok(Redirect::to("/add"))
}

/// POST /complete/{id}
async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> HandlerResult<Redirect> {
    refresh(&state).await?;
    let id = TaskId::new(id);
    if state.store.complete_task(id).await.map_err(internal_error)? {
        tracing::info!("Completed task {}", id);
    } else {
        tracing::debug!("Complete ignored: task {} not found", id);
    }
    Ok(Redirect::to("/schedule"))
}

/// GET /schedule
async fn schedule(State(state): State<Arc<AppState>>) -> HandlerResult<Html<String>> {
    refresh(&state).await?;
    let tasks = state
        .store
        .list_tasks(TaskOrder::PriorityThenDueDate)
        .await
        .map_err(internal_error)?;
    let summary = progress::summarize(&tasks);
    let body = state
        .views
        .schedule(&tasks, &summary)
        .map_err(internal_error)?;
    Ok(Html(body))
}
