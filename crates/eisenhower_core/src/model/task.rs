//! Task record and input normalization.
//!
//! # Responsibility
//! - Define the canonical task shape persisted by repositories.
//! - Normalize titles/descriptions before validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `created_at` is set once at creation and never changes.
//! - `quadrant()` depends only on `is_urgent` and `is_important`.

use super::quadrant::Quadrant;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Completion state projection used by status filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Pending,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Field-level validation failures for task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "task title is {actual} characters long; maximum is {max}")
            }
            Self::DescriptionTooLong { max, actual } => write!(
                f,
                "task description is {actual} characters long; maximum is {max}"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub is_urgent: bool,
    pub is_important: bool,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates a pending, non-urgent, non-important task with a fresh ID.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), title, now_epoch_ms())
    }

    /// Creates a task with a caller-provided identity and creation time.
    ///
    /// Used by seed/import paths where the identity already exists.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: normalize_title(&title.into()),
            description: None,
            is_urgent: false,
            is_important: false,
            completed: false,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks field constraints without mutating the record.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(TaskValidationError::TitleTooLong {
                max: MAX_TITLE_CHARS,
                actual: title_chars,
            });
        }
        if let Some(description) = &self.description {
            let description_chars = description.chars().count();
            if description_chars > MAX_DESCRIPTION_CHARS {
                return Err(TaskValidationError::DescriptionTooLong {
                    max: MAX_DESCRIPTION_CHARS,
                    actual: description_chars,
                });
            }
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = normalize_title(title);
    }

    /// Replaces the description; blank input clears it.
    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = normalize_description(description);
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.is_urgent, self.is_important)
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

/// Trims and collapses whitespace runs to single spaces.
pub fn normalize_title(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}

pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
