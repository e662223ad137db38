//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete entry points over an injected repository.
//! - Implement matrix views: quadrant and status filters, keyword search, stats.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - `stats()` counts always sum to `total_tasks`.

use crate::model::quadrant::Quadrant;
use crate::model::task::{normalize_title, Task, TaskId, TaskStatus, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimum number of characters accepted by [`TaskService::search_tasks`].
pub const MIN_SEARCH_CHARS: usize = 2;

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    InvalidQuadrant(String),
    InvalidStatus(String),
    QueryTooShort { min_chars: usize },
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidQuadrant(value) => {
                write!(f, "invalid quadrant `{value}`; use one of Q1, Q2, Q3, Q4")
            }
            Self::InvalidStatus(value) => {
                write!(f, "unknown status `{value}`; use `completed` or `pending`")
            }
            Self::QueryTooShort { min_chars } => {
                write!(f, "search query must contain at least {min_chars} characters")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub is_urgent: bool,
    pub is_important: bool,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
///
/// `description: Some("")` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_urgent: Option<bool>,
    pub is_important: Option<bool>,
    pub completed: Option<bool>,
}

/// Per-quadrant counts keyed by wire code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuadrantCounts {
    #[serde(rename = "Q1")]
    pub do_first: usize,
    #[serde(rename = "Q2")]
    pub schedule: usize,
    #[serde(rename = "Q3")]
    pub delegate: usize,
    #[serde(rename = "Q4")]
    pub eliminate: usize,
}

impl QuadrantCounts {
    pub fn get(&self, quadrant: Quadrant) -> usize {
        match quadrant {
            Quadrant::DoFirst => self.do_first,
            Quadrant::Schedule => self.schedule,
            Quadrant::Delegate => self.delegate,
            Quadrant::Eliminate => self.eliminate,
        }
    }

    fn increment(&mut self, quadrant: Quadrant) {
        let slot = match quadrant {
            Quadrant::DoFirst => &mut self.do_first,
            Quadrant::Schedule => &mut self.schedule,
            Quadrant::Delegate => &mut self.delegate,
            Quadrant::Eliminate => &mut self.eliminate,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
}

/// Aggregate view over all tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub by_quadrant: QuadrantCounts,
    pub by_status: StatusCounts,
}

/// Use-case service over an owned repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a task, returning the stored record.
    pub fn create_task(&self, input: NewTask) -> TaskServiceResult<Task> {
        let mut task = Task::new(input.title)?;
        task.set_description(input.description.as_deref());
        task.is_urgent = input.is_urgent;
        task.is_important = input.is_important;
        task.completed = input.completed;

        self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} quadrant={}",
            task.id,
            task.quadrant().code()
        );
        Ok(task)
    }

    /// Loads a task or fails with `TaskNotFound`.
    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    pub fn list_tasks(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(&TaskListQuery::default())?)
    }

    /// Applies a partial update and returns the stored record.
    pub fn update_task(&self, id: TaskId, patch: TaskPatch) -> TaskServiceResult<Task> {
        let mut task = self.get_task(id)?;

        if let Some(title) = patch.title.as_deref() {
            task.set_title(title);
        }
        if let Some(description) = patch.description.as_deref() {
            task.set_description(Some(description));
        }
        if let Some(is_urgent) = patch.is_urgent {
            task.is_urgent = is_urgent;
        }
        if let Some(is_important) = patch.is_important {
            task.is_important = is_important;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        self.repo.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={} quadrant={} completed={}",
            task.id,
            task.quadrant().code(),
            task.completed
        );
        Ok(task)
    }

    pub fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Lists tasks in one quadrant, addressed by wire code (`Q1`..`Q4`).
    pub fn tasks_by_quadrant(&self, code: &str) -> TaskServiceResult<(Quadrant, Vec<Task>)> {
        let quadrant = Quadrant::from_code(code)
            .ok_or_else(|| TaskServiceError::InvalidQuadrant(code.to_string()))?;
        let query = TaskListQuery {
            quadrant: Some(quadrant),
            ..TaskListQuery::default()
        };
        Ok((quadrant, self.repo.list_tasks(&query)?))
    }

    /// Lists tasks by completion state (`completed` or `pending`).
    pub fn tasks_by_status(&self, status: &str) -> TaskServiceResult<(TaskStatus, Vec<Task>)> {
        let status = TaskStatus::parse(status)
            .ok_or_else(|| TaskServiceError::InvalidStatus(status.to_string()))?;
        let query = TaskListQuery {
            completed: Some(status == TaskStatus::Completed),
            ..TaskListQuery::default()
        };
        Ok((status, self.repo.list_tasks(&query)?))
    }

    /// Case-insensitive substring search over title and description.
    ///
    /// # Errors
    /// - `QueryTooShort` when the trimmed query has fewer than
    ///   [`MIN_SEARCH_CHARS`] characters.
    pub fn search_tasks(&self, text: &str) -> TaskServiceResult<Vec<Task>> {
        let needle = normalize_title(text).to_lowercase();
        if needle.chars().count() < MIN_SEARCH_CHARS {
            return Err(TaskServiceError::QueryTooShort {
                min_chars: MIN_SEARCH_CHARS,
            });
        }

        let hits: Vec<Task> = self
            .list_tasks()?
            .into_iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|description| description.to_lowercase().contains(&needle))
            })
            .collect();
        debug!(
            "event=task_search module=service status=ok hits={}",
            hits.len()
        );
        Ok(hits)
    }

    pub fn stats(&self) -> TaskServiceResult<TaskStats> {
        let mut stats = TaskStats::default();
        for task in self.list_tasks()? {
            stats.total_tasks += 1;
            stats.by_quadrant.increment(task.quadrant());
            match task.status() {
                TaskStatus::Completed => stats.by_status.completed += 1,
                TaskStatus::Pending => stats.by_status.pending += 1,
            }
        }
        Ok(stats)
    }

    /// Inserts one sample task per quadrant when the store is empty.
    ///
    /// Returns the number of inserted tasks (0 when tasks already exist).
    pub fn seed_demo_tasks(&self) -> TaskServiceResult<usize> {
        let existing = self.repo.list_tasks(&TaskListQuery {
            limit: Some(1),
            ..TaskListQuery::default()
        })?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let samples = demo_tasks()?;
        for task in &samples {
            self.repo.create_task(task)?;
        }
        info!(
            "event=demo_seed module=service status=ok inserted={}",
            samples.len()
        );
        Ok(samples.len())
    }
}

fn demo_tasks() -> Result<Vec<Task>, TaskValidationError> {
    let specs: [(&str, Option<&str>, bool, bool, bool); 4] = [
        (
            "Ship the API project",
            Some("Finish the endpoints and write the documentation"),
            true,
            true,
            false,
        ),
        (
            "Learn SQL migrations",
            Some("Read the docs and try the examples"),
            false,
            true,
            false,
        ),
        ("Attend the lecture", None, true, false, false),
        (
            "Watch a series",
            Some("New season of a favourite show"),
            false,
            false,
            true,
        ),
    ];

    specs
        .into_iter()
        .map(|(title, description, is_urgent, is_important, completed)| {
            let mut task = Task::new(title)?;
            task.set_description(description);
            task.is_urgent = is_urgent;
            task.is_important = is_important;
            task.completed = completed;
            Ok(task)
        })
        .collect()
}

/// Parses a textual task ID.
pub fn parse_task_id(value: &str) -> Option<TaskId> {
    Uuid::parse_str(value.trim()).ok()
}
