/*!
 * Turn Scheduler Library
 * Multi-level FIFO task scheduler with a synchronous turn loop
 */

pub mod core;
pub mod menu;
pub mod monitoring;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::SchedulerError;
pub use crate::core::types::{Level, SchedulerResult, TaskId, Turn, Work};
pub use menu::{Menu, TaskFactory};
pub use monitoring::{init_tracing, SessionSpan};
pub use scheduler::{
    Disposition, RunReport, Scheduler, SchedulerConfig, SchedulerEvent, SchedulerSnapshot,
    SharedScheduler, Task, TaskMetadata, TaskQueue, TurnOutcome,
};
