/*!
 * Turn Scheduler
 * Multi-level FIFO run queues driven by a synchronous turn loop
 */

use crate::core::types::{Level, SchedulerResult, TaskId, Work};
use ahash::AHashMap;
use tracing::debug;
use uuid::Uuid;

mod events;
mod operations;
mod policy;
mod queue;
mod shared;
mod stats;
mod task;
mod types;

pub use events::SchedulerEvent;
pub use queue::TaskQueue;
pub use shared::SharedScheduler;
pub use stats::{LevelSnapshot, QueuedTask, SchedulerSnapshot};
pub use task::{Task, TaskMetadata};
pub use types::{validate_quantum, Disposition, RunReport, SchedulerConfig, TurnOutcome};

/// Level every new task is admitted into
pub const ENTRY_LEVEL: Level = 0;

/// Turn scheduler
///
/// Owns one queue per level. Every pending task sits in exactly one queue,
/// and `locations` mirrors that placement for O(1) lookup. A task is dropped
/// the turn its remaining time reaches zero.
///
/// Single-owner and synchronous: wrap it in [`SharedScheduler`] to accept
/// submissions from several threads.
pub struct Scheduler {
    config: SchedulerConfig,
    queues: Vec<TaskQueue>,

    // Pending task index: id -> level currently holding it
    locations: AHashMap<TaskId, Level>,

    // One-shot skip flags, one per level
    skip_flags: Vec<bool>,

    report: RunReport,
    // Work still owed to pending tasks; minutes_worked + outstanding never overflows
    outstanding: Work,
    events: Option<Vec<SchedulerEvent>>,

    // Correlates this scheduler's trace events
    run_id: Uuid,
}

impl Scheduler {
    /// Create a scheduler from a validated configuration
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a multi-level scheduler
    pub fn with_levels(levels: usize, quantum: u64) -> SchedulerResult<Self> {
        Self::new(SchedulerConfig::new(levels, quantum))
    }

    /// Create a single-queue round-robin scheduler
    pub fn round_robin(quantum: u64) -> SchedulerResult<Self> {
        Self::with_levels(1, quantum)
    }

    fn build(config: SchedulerConfig) -> Self {
        let queues = (0..config.levels)
            .map(|level| TaskQueue::with_limit(level, config.queue_capacity))
            .collect();
        let run_id = Uuid::new_v4();

        debug!(
            run_id = %run_id,
            levels = config.levels,
            quantum = config.quantum,
            queue_capacity = ?config.queue_capacity,
            "Scheduler initialized"
        );

        Self {
            skip_flags: vec![false; config.levels],
            events: config.record_events.then(Vec::new),
            queues,
            locations: AHashMap::new(),
            report: RunReport::default(),
            outstanding: 0,
            config,
            run_id,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn record(&mut self, event: SchedulerEvent) {
        if let Some(events) = self.events.as_mut() {
            events.push(event);
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("run_id", &self.run_id)
            .field("config", &self.config)
            .field("queues", &self.queues)
            .field("report", &self.report)
            .finish()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::build(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SchedulerError;

    #[test]
    fn test_round_robin_example_trace() {
        let mut scheduler = Scheduler::round_robin(2).unwrap();
        scheduler.add_task(Task::new("T1", 5)).unwrap();
        scheduler.add_task(Task::new("T2", 3)).unwrap();

        let mut trace = Vec::new();
        while let Some(outcome) = scheduler.step().unwrap() {
            trace.push((outcome.task_id.to_string(), outcome.remaining));
        }

        assert_eq!(
            trace,
            vec![
                ("T1".to_string(), 3),
                ("T2".to_string(), 1),
                ("T1".to_string(), 1),
                ("T2".to_string(), 0),
                ("T1".to_string(), 0),
            ]
        );
        assert_eq!(
            scheduler.report(),
            RunReport {
                turns: 5,
                minutes_worked: 8,
                completed: 2
            }
        );
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler = Scheduler::default();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.step().unwrap(), None);
        assert_eq!(scheduler.run().unwrap(), RunReport::default());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            Scheduler::with_levels(0, 1),
            Err(SchedulerError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Scheduler::round_robin(0),
            Err(SchedulerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_demotion_to_next_level() {
        let mut scheduler = Scheduler::with_levels(3, 1).unwrap();
        scheduler.add_task(Task::new("a", 3)).unwrap();

        let first = scheduler.step().unwrap().unwrap();
        assert_eq!(first.level, 0);
        assert_eq!(first.disposition, Disposition::Requeued { level: 1 });
        assert_eq!(scheduler.location(&TaskId::from("a")), Some(1));
        assert_eq!(scheduler.queue_lengths(), vec![0, 1, 0]);

        let second = scheduler.step().unwrap().unwrap();
        assert_eq!(second.level, 1);
        assert_eq!(second.disposition, Disposition::Requeued { level: 2 });

        let third = scheduler.step().unwrap().unwrap();
        assert_eq!(third.level, 2);
        assert_eq!(third.disposition, Disposition::Completed);
        assert_eq!(scheduler.location(&TaskId::from("a")), None);
    }
}
