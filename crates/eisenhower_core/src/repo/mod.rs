//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the service layer is generic over.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
