//! HTTP error envelope.
//!
//! # Invariants
//! - Every error body is `{"error": <code>, "detail": <message>}`.
//! - Storage faults are logged with detail but answered with a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eisenhower_core::{RepoError, TaskServiceError};
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;

#[derive(Debug)]
pub enum ApiError {
    Service(TaskServiceError),
    InvalidTaskId(String),
    /// Body is not valid JSON for the route's request schema.
    InvalidBody(String),
    /// The blocking task running a use-case panicked or was cancelled.
    WorkerFailed(String),
    RouteNotFound(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                TaskServiceError::Validation(_)
                | TaskServiceError::InvalidQuadrant(_)
                | TaskServiceError::QueryTooShort { .. } => StatusCode::BAD_REQUEST,
                TaskServiceError::TaskNotFound(_) | TaskServiceError::InvalidStatus(_) => {
                    StatusCode::NOT_FOUND
                }
                TaskServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidTaskId(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::WorkerFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Service(err) => match err {
                TaskServiceError::Validation(_) => "validation_failed",
                TaskServiceError::TaskNotFound(_) => "task_not_found",
                TaskServiceError::InvalidQuadrant(_) => "invalid_quadrant",
                TaskServiceError::InvalidStatus(_) => "status_not_found",
                TaskServiceError::QueryTooShort { .. } => "query_too_short",
                TaskServiceError::Repo(_) => "storage_error",
            },
            Self::InvalidTaskId(_) => "invalid_task_id",
            Self::InvalidBody(_) => "invalid_body",
            Self::WorkerFailed(_) => "worker_failed",
            Self::RouteNotFound(_) => "route_not_found",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::InvalidTaskId(value) => write!(f, "`{value}` is not a valid task id"),
            Self::InvalidBody(message) => write!(f, "invalid request body: {message}"),
            Self::WorkerFailed(message) => write!(f, "request worker failed: {message}"),
            Self::RouteNotFound(path) => write!(f, "no route for `{path}`"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(value: TaskServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidBody(value.body_text())
    }
}

impl From<JoinError> for ApiError {
    fn from(value: JoinError) -> Self {
        Self::WorkerFailed(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            error!(
                "event=http_error module=api status=error code={} error={}",
                self.code(),
                self
            );
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.code(),
            detail,
        };
        (status, Json(body)).into_response()
    }
}
