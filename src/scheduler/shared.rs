/*!
 * Shared Scheduler Handle
 * Serializes submissions and turns from several producers
 */

use super::stats::SchedulerSnapshot;
use super::task::Task;
use super::types::{RunReport, SchedulerConfig, TurnOutcome};
use super::Scheduler;
use crate::core::types::{SchedulerResult, TaskId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one scheduler
///
/// Every call takes the single lock for its whole duration, so a full `run`
/// is atomic with respect to submissions. Use `step` or `run_turns` to let
/// producers interleave between turns.
#[derive(Clone)]
pub struct SharedScheduler {
    inner: Arc<Mutex<Scheduler>>,
}

impl SharedScheduler {
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        Ok(Self::from(Scheduler::new(config)?))
    }

    pub fn add_task(&self, task: Task) -> SchedulerResult<()> {
        self.inner.lock().add_task(task)
    }

    pub fn submit(&self, id: impl Into<TaskId>, remaining_time: u64) -> SchedulerResult<()> {
        self.inner.lock().submit(id, remaining_time)
    }

    pub fn step(&self) -> SchedulerResult<Option<TurnOutcome>> {
        self.inner.lock().step()
    }

    pub fn run(&self) -> SchedulerResult<RunReport> {
        self.inner.lock().run()
    }

    pub fn run_turns(&self, max_turns: u64) -> SchedulerResult<RunReport> {
        self.inner.lock().run_turns(max_turns)
    }

    pub fn report(&self) -> RunReport {
        self.inner.lock().report()
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn queue_lengths(&self) -> Vec<usize> {
        self.inner.lock().queue_lengths()
    }

    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.inner.lock().pending_ids()
    }

    /// Run `f` with exclusive access to the scheduler
    pub fn with<R>(&self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<Scheduler> for SharedScheduler {
    fn from(scheduler: Scheduler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }
}

impl Default for SharedScheduler {
    fn default() -> Self {
        Self::from(Scheduler::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_producers() {
        let shared = SharedScheduler::new(SchedulerConfig::new(2, 2)).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|producer| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        shared
                            .submit(format!("p{}-{}", producer, i), i % 5 + 1)
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.queue_lengths(), vec![100, 0]);
        let expected: u64 = (0..25u64).map(|i| i % 5 + 1).sum::<u64>() * 4;

        let report = shared.run().unwrap();
        assert_eq!(report.completed, 100);
        assert_eq!(report.minutes_worked, expected);
        assert!(shared.pending_ids().is_empty());
    }

    #[test]
    fn test_interleaved_steps_and_submissions() {
        let shared = SharedScheduler::default();
        shared.submit("a", 2).unwrap();
        shared.step().unwrap();
        shared.submit("b", 1).unwrap();

        let report = shared.run().unwrap();
        assert_eq!(report.completed, 2);
        assert_eq!(shared.with(|s| s.len()), 0);
    }
}
