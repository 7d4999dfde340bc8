//! # Taskboard
//!
//! Personal task tracker served as a small HTML web application.
//!
//! This library provides:
//! - A task model with derived New/Stale/Completed status
//! - Priority allocation that keeps every task's priority unique
//! - A schedule view with completion progress and rule-based advice
//! - A weather lookup and an inspiration page backed by external APIs
//!
//! ## Request Flow
//! 1. Refresh every task's status against today's date
//! 2. Run the requested operation inside one store transaction
//! 3. Render the page (or redirect after a mutation)
//!
//! ## Modules
//! - `task`: Task model and the pure status/priority/progress rules
//! - `store`: SQLite and in-memory task storage
//! - `external`: Weather and quote clients with fallbacks
//! - `api`: axum router, handlers and HTML views

pub mod api;
pub mod clock;
pub mod config;
pub mod external;
pub mod store;
pub mod task;
pub mod util;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use store::{StoreType, TaskStore};
