/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Level, TaskId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler errors with serialization support
///
/// Every variant is a caller or invariant fault: nothing here is transient,
/// so none of them is retried.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Invalid task {0}: remaining time must be positive")]
    #[diagnostic(
        code(scheduler::invalid_task),
        help("Only tasks with work left can be queued. Finished tasks are dropped, not requeued.")
    )]
    InvalidTask(TaskId),

    #[error("Queue at level {0} is empty")]
    #[diagnostic(
        code(scheduler::empty_queue),
        help("Check is_empty() before calling dequeue().")
    )]
    EmptyQueue(Level),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(scheduler::invalid_configuration),
        help("Quantum, level count, capacity and turn limits must all be positive.")
    )]
    InvalidConfiguration(String),

    #[error("Scheduler exhausted: {0}")]
    #[diagnostic(
        code(scheduler::exhausted),
        help("A turn started with no task to run. Queue bookkeeping is out of sync; please report this.")
    )]
    SchedulerExhausted(String),

    #[error("Task {0} is already pending")]
    #[diagnostic(
        code(scheduler::duplicate_task),
        help("Task ids must be unique among pending tasks. Reuse an id only after its task completed.")
    )]
    DuplicateTask(TaskId),

    #[error("Queue at level {level} is at capacity ({capacity})")]
    #[diagnostic(
        code(scheduler::queue_full),
        help("Run some turns to drain the queue, or raise the queue capacity.")
    )]
    QueueFull { level: Level, capacity: usize },

    #[error("Level {0} does not exist")]
    #[diagnostic(
        code(scheduler::unknown_level),
        help("Levels are numbered from 0 to levels - 1.")
    )]
    UnknownLevel(Level),

    #[error("Task {0} would overflow the work counter")]
    #[diagnostic(
        code(scheduler::work_overflow),
        help("Worked plus outstanding work must fit in a u64. Split the task or start a new scheduler.")
    )]
    WorkOverflow(TaskId),

    #[error("Item '{0}' is not on the menu")]
    #[diagnostic(
        code(scheduler::unknown_item),
        help("Pick an item from the menu, or register it first.")
    )]
    UnknownItem(String),
}

impl SchedulerError {
    /// Stable machine-readable name of the error kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTask(_) => "invalid_task",
            Self::EmptyQueue(_) => "empty_queue",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::SchedulerExhausted(_) => "scheduler_exhausted",
            Self::DuplicateTask(_) => "duplicate_task",
            Self::QueueFull { .. } => "queue_full",
            Self::UnknownLevel(_) => "unknown_level",
            Self::WorkOverflow(_) => "work_overflow",
            Self::UnknownItem(_) => "unknown_item",
        }
    }
}
