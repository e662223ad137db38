//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and the Eisenhower quadrant classifier.
//! - Normalize and validate user-provided task fields.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Quadrant placement is derived from the urgency/importance flags and is
//!   never stored alongside them.

pub mod quadrant;
pub mod task;
