/*!
 * Scheduler Core Operations
 * Admit tasks, select the active level, and run turns
 */

use super::events::SchedulerEvent;
use super::task::Task;
use super::types::{validate_quantum, Disposition, RunReport, TurnOutcome};
use super::{Scheduler, ENTRY_LEVEL};
use crate::core::errors::SchedulerError;
use crate::core::types::{Level, SchedulerResult, TaskId, Work};
use tracing::{debug, debug_span, trace};

impl Scheduler {
    /// Admit a new task into the entry level
    ///
    /// On error the scheduler is left untouched.
    pub fn add_task(&mut self, mut task: Task) -> SchedulerResult<()> {
        if task.is_complete() {
            debug!(task = %task.id(), "Rejected task with no remaining time");
            return Err(SchedulerError::InvalidTask(task.id().clone()));
        }

        if self.locations.contains_key(task.id()) {
            debug!(task = %task.id(), "Rejected duplicate task id");
            return Err(SchedulerError::DuplicateTask(task.id().clone()));
        }

        let owed = self
            .report
            .minutes_worked
            .checked_add(self.outstanding)
            .and_then(|w| w.checked_add(task.remaining_time()));
        if owed.is_none() {
            debug!(task = %task.id(), "Rejected task that would overflow the work counter");
            return Err(SchedulerError::WorkOverflow(task.id().clone()));
        }

        let turn = self.report.turns;
        task.mark_arrival(turn);
        let id = task.id().clone();
        let remaining = task.remaining_time();

        self.queues[ENTRY_LEVEL].enqueue(task)?;
        self.locations.insert(id.clone(), ENTRY_LEVEL);
        self.outstanding += remaining;

        debug!(task = %id, remaining, level = ENTRY_LEVEL, "Task admitted");
        self.record(SchedulerEvent::Admitted {
            turn,
            task: id,
            level: ENTRY_LEVEL,
            remaining,
        });
        Ok(())
    }

    /// Admit a task built from an id and a work budget
    pub fn submit(&mut self, id: impl Into<TaskId>, remaining_time: Work) -> SchedulerResult<()> {
        self.add_task(Task::new(id, remaining_time))
    }

    /// Run exactly one turn with the configured quantum
    ///
    /// Returns `None` without touching any counter when nothing is pending.
    pub fn step(&mut self) -> SchedulerResult<Option<TurnOutcome>> {
        let quantum = self.config.quantum;
        self.turn(quantum)
    }

    /// Run turns until every queue is empty, using the configured quantum
    pub fn run(&mut self) -> SchedulerResult<RunReport> {
        let quantum = self.config.quantum;
        self.run_with_quantum(quantum)
    }

    /// Run turns until every queue is empty with an explicit quantum
    ///
    /// Returns the cumulative counters. Terminates because each turn strictly
    /// decreases the remaining time of the task it runs.
    pub fn run_with_quantum(&mut self, quantum: Work) -> SchedulerResult<RunReport> {
        validate_quantum(quantum)?;

        let span = debug_span!("run", run_id = %self.run_id, quantum);
        let _enter = span.enter();

        let before = self.report;
        while self.turn(quantum)?.is_some() {}

        debug!(
            turns = self.report.turns - before.turns,
            minutes_worked = self.report.minutes_worked - before.minutes_worked,
            completed = self.report.completed - before.completed,
            "Run drained all queues"
        );
        Ok(self.report)
    }

    /// Run at most `max_turns` turns, stopping early when idle
    pub fn run_turns(&mut self, max_turns: u64) -> SchedulerResult<RunReport> {
        if max_turns == 0 {
            return Err(SchedulerError::InvalidConfiguration(
                "turn limit must be at least 1".into(),
            ));
        }

        let quantum = self.config.quantum;
        let span = debug_span!("run_turns", run_id = %self.run_id, quantum, max_turns);
        let _enter = span.enter();

        for _ in 0..max_turns {
            if self.turn(quantum)?.is_none() {
                break;
            }
        }
        Ok(self.report)
    }

    fn turn(&mut self, quantum: Work) -> SchedulerResult<Option<TurnOutcome>> {
        let Some(level) = self.select_level() else {
            return Ok(None);
        };

        let mut task = self.queues[level].dequeue().map_err(|err| {
            SchedulerError::SchedulerExhausted(format!("level {} was selected but {}", level, err))
        })?;

        let work = task.run_slice(quantum);
        let remaining = task.remaining_time();
        let id = task.id().clone();

        self.outstanding -= work;
        self.report.minutes_worked += work;
        self.report.turns += 1;
        let turn = self.report.turns;

        let disposition = if task.is_complete() {
            self.locations.remove(&id);
            self.report.completed += 1;
            self.record(SchedulerEvent::Completed {
                turn,
                task: id.clone(),
                level,
                work,
            });
            Disposition::Completed
        } else {
            // Demote one level, clamped at the lowest; one level is plain round robin
            let target = (level + 1).min(self.queues.len() - 1);
            self.queues[target].requeue(task)?;
            self.locations.insert(id.clone(), target);
            self.record(SchedulerEvent::Worked {
                turn,
                task: id.clone(),
                level,
                work,
                remaining,
                requeued_to: target,
            });
            Disposition::Requeued { level: target }
        };

        trace!(turn, task = %id, level, work, remaining, ?disposition, "Turn complete");

        Ok(Some(TurnOutcome {
            turn,
            task_id: id,
            level,
            work,
            remaining,
            disposition,
        }))
    }

    /// Pick the lowest non-empty level, honoring one-shot skip flags
    ///
    /// A flagged non-empty level is passed over once, and only when a later
    /// unflagged level runs instead. If only flagged levels have work, the
    /// first of them runs anyway with its flag cleared quietly; the flags of
    /// the others stay armed.
    fn select_level(&mut self) -> Option<Level> {
        let selected = self.next_level()?;

        if self.skip_flags[selected] {
            self.skip_flags[selected] = false;
            return Some(selected);
        }

        let turn = self.report.turns + 1;
        for level in 0..selected {
            if self.skip_flags[level] && !self.queues[level].is_empty() {
                self.skip_flags[level] = false;
                self.record(SchedulerEvent::Skipped { turn, level });
                trace!(level, "Level skipped");
            }
        }

        Some(selected)
    }

    /// Level the next turn would run, without consuming skip flags
    pub fn next_level(&self) -> Option<Level> {
        let mut fallback = None;
        for (level, queue) in self.queues.iter().enumerate() {
            if queue.is_empty() {
                continue;
            }
            if !self.skip_flags[level] {
                return Some(level);
            }
            fallback.get_or_insert(level);
        }
        fallback
    }
}
