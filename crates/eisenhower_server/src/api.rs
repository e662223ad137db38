//! HTTP routes for the task resource.
//!
//! # Responsibility
//! - Translate JSON requests into `TaskService` use-cases.
//! - Shape responses into stable envelopes (`{count, tasks}` and friends).
//!
//! # Invariants
//! - The connection lock is taken only on the blocking pool, inside
//!   `with_task_service`; async workers never wait on SQLite.
//! - Schema is checked once in [`AppState::try_new`], not per request.
//! - Unparseable request bodies answer `invalid_body` in the error envelope.
//! - `quadrant`/`quadrant_label` in responses are derived, never accepted
//!   as input.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use eisenhower_core::{
    check_schema, core_version, parse_task_id, NewTask, RepoError, SqliteTaskRepository, Task,
    TaskId, TaskPatch, TaskService, TaskServiceResult, TaskStats,
};
use log::{debug, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

pub const API_TITLE: &str = "To-Do list API";
pub const API_DESCRIPTION: &str = "API for managing tasks with the Eisenhower matrix";
const WELCOME_MESSAGE: &str = "Hello, student!";
const CONTACT_NAME: &str = "Eisenhower To-Do maintainers";

/// Shared router state owning the task store connection.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Takes ownership of a migrated connection.
    ///
    /// # Errors
    /// - Any [`check_schema`] failure (unmigrated or incomplete `tasks` table).
    pub fn try_new(conn: Connection) -> Result<Self, RepoError> {
        check_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts the sample tasks when the store is empty; returns how many.
    pub async fn seed_demo_tasks(&self) -> Result<usize, ApiError> {
        with_task_service(self, |service| service.seed_demo_tasks()).await
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/stats", get(task_stats))
        .route("/tasks/search", get(search_tasks))
        .route("/tasks/quadrant/{quadrant}", get(tasks_by_quadrant))
        .route("/tasks/status/{status}", get(tasks_by_status))
        .route(
            "/tasks/{task_id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .fallback(route_not_found)
        .with_state(state)
}

/// Wire representation of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub is_urgent: bool,
    pub is_important: bool,
    /// Quadrant code (`Q1`..`Q4`).
    pub quadrant: String,
    pub quadrant_label: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        let quadrant = task.quadrant();
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_urgent: task.is_urgent,
            is_important: task.is_important,
            quadrant: quadrant.code().to_string(),
            quadrant_label: quadrant.label().to_string(),
            completed: task.completed,
            created_at: task.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update body; absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    /// Empty string clears the description.
    pub description: Option<String>,
    pub is_urgent: Option<bool>,
    pub is_important: Option<bool>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
struct TaskList {
    count: usize,
    tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize)]
struct CreatedTask {
    message: &'static str,
    task: TaskView,
}

#[derive(Debug, Serialize)]
struct SearchResults {
    query: String,
    count: usize,
    tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize)]
struct QuadrantTasks {
    quadrant: &'static str,
    label: &'static str,
    action: &'static str,
    count: usize,
    tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize)]
struct StatusTasks {
    status: &'static str,
    count: usize,
    tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize)]
struct Contact {
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct Welcome {
    message: &'static str,
    title: &'static str,
    description: &'static str,
    version: &'static str,
    contact: Contact,
}

async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE,
        title: API_TITLE,
        description: API_DESCRIPTION,
        version: core_version(),
        contact: Contact { name: CONTACT_NAME },
    })
}

async fn list_tasks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tasks = with_task_service(&state, |service| service.list_tasks()).await?;
    Ok(Json(task_list(tasks)))
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = NewTask {
        title: request.title,
        description: request.description,
        is_urgent: request.is_urgent,
        is_important: request.is_important,
        completed: request.completed,
    };
    let task = with_task_service(&state, move |service| service.create_task(input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedTask {
            message: "Task created",
            task: task.into(),
        }),
    ))
}

async fn task_stats(State(state): State<AppState>) -> Result<Json<TaskStats>, ApiError> {
    let stats = with_task_service(&state, |service| service.stats()).await?;
    Ok(Json(stats))
}

async fn search_tasks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.clone();
    let tasks = with_task_service(&state, move |service| service.search_tasks(&query)).await?;
    debug!(
        "event=http_search module=api status=ok hits={}",
        tasks.len()
    );
    Ok(Json(SearchResults {
        query: params.q,
        count: tasks.len(),
        tasks: tasks.into_iter().map(TaskView::from).collect(),
    }))
}

async fn tasks_by_quadrant(
    State(state): State<AppState>,
    Path(quadrant): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (quadrant, tasks) =
        with_task_service(&state, move |service| service.tasks_by_quadrant(&quadrant)).await?;
    Ok(Json(QuadrantTasks {
        quadrant: quadrant.code(),
        label: quadrant.label(),
        action: quadrant.action(),
        count: tasks.len(),
        tasks: tasks.into_iter().map(TaskView::from).collect(),
    }))
}

async fn tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (status, tasks) =
        with_task_service(&state, move |service| service.tasks_by_status(&status)).await?;
    Ok(Json(StatusTasks {
        status: status.as_str(),
        count: tasks.len(),
        tasks: tasks.into_iter().map(TaskView::from).collect(),
    }))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskView>, ApiError> {
    let id = task_id_from_path(&task_id)?;
    let task = with_task_service(&state, move |service| service.get_task(id)).await?;
    Ok(Json(task.into()))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let id = task_id_from_path(&task_id)?;
    let Json(request) = payload?;
    let patch = TaskPatch {
        title: request.title,
        description: request.description,
        is_urgent: request.is_urgent,
        is_important: request.is_important,
        completed: request.completed,
    };
    let task = with_task_service(&state, move |service| service.update_task(id, patch)).await?;
    Ok(Json(task.into()))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = task_id_from_path(&task_id)?;
    with_task_service(&state, move |service| service.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

fn task_list(tasks: Vec<Task>) -> TaskList {
    TaskList {
        count: tasks.len(),
        tasks: tasks.into_iter().map(TaskView::from).collect(),
    }
}

fn task_id_from_path(raw: &str) -> Result<TaskId, ApiError> {
    parse_task_id(raw).ok_or_else(|| ApiError::InvalidTaskId(raw.to_string()))
}

/// Runs one use-case on the blocking pool against the shared connection.
async fn with_task_service<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> TaskServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || run_locked(&state, f)).await?
}

fn run_locked<T>(
    state: &AppState,
    f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> TaskServiceResult<T>,
) -> Result<T, ApiError> {
    let conn = lock_store(&state.conn);
    let service = TaskService::new(SqliteTaskRepository::new_checked(&conn));
    Ok(f(&service)?)
}

/// A panicking use-case leaves its statement rolled back by SQLite, so the
/// connection stays usable after poisoning.
fn lock_store(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| {
        warn!("event=store_lock module=api status=recovered reason=poisoned");
        conn.clear_poison();
        poisoned.into_inner()
    })
}
