//! Core domain logic for the Eisenhower to-do service.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::quadrant::Quadrant;
pub use model::task::{Task, TaskId, TaskStatus, TaskValidationError};
pub use repo::task_repo::{
    check_schema, RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
pub use service::task_service::{
    parse_task_id, NewTask, QuadrantCounts, StatusCounts, TaskPatch, TaskService,
    TaskServiceError, TaskServiceResult, TaskStats, MIN_SEARCH_CHARS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
