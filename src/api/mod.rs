//! HTTP surface for taskboard.
//!
//! ## Endpoints
//!
//! - `GET /` - Tasks ordered by priority
//! - `GET /add` - Add form and editable task list
//! - `POST /add` - Create a task (shifts priorities to make room)
//! - `POST /edit/{id}` - Partial update
//! - `POST /delete/{id}` - Hard delete
//! - `POST /complete/{id}` - Mark completed
//! - `GET /schedule` - Tasks by priority and due date, with progress and advice
//! - `GET /inspiration` - Random tip and quote
//! - `GET /weather?city=<name>` - Current weather
//! - `GET /health` - Health check
//! - `GET /static/*` - Stylesheet and other assets
//!
//! Mutating endpoints answer with a 303 redirect.

pub mod forms;
mod lookups;
mod routes;
mod tasks;
pub mod types;
pub mod views;

pub use routes::{app, serve, AppState};
pub use types::*;
