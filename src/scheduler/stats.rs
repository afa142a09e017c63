/*!
 * Scheduler Statistics
 * Counters, read-only introspection and display snapshots
 */

use super::events::SchedulerEvent;
use super::types::RunReport;
use super::Scheduler;
use crate::core::types::{Level, TaskId, Turn, Work};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queued task as seen in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueuedTask {
    pub id: TaskId,
    pub remaining: Work,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_turn: Option<Turn>,
}

/// One level of a snapshot, tasks listed head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LevelSnapshot {
    pub level: Level,
    pub len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub skip_pending: bool,
    pub tasks: Vec<QueuedTask>,
}

/// Point-in-time view of the whole scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerSnapshot {
    pub report: RunReport,
    pub quantum: Work,
    pub next_level: Option<Level>,
    pub levels: Vec<LevelSnapshot>,
}

impl fmt::Display for SchedulerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let next = self
            .next_level
            .map_or_else(|| "none".to_string(), |l| l.to_string());
        writeln!(
            f,
            "display turn={} minutes={} completed={} quantum={} next={}",
            self.report.turns, self.report.minutes_worked, self.report.completed, self.quantum, next
        )?;

        for level in &self.levels {
            let capacity = level
                .capacity
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            let skip = if level.skip_pending { " [skip]" } else { "" };
            let tasks = level
                .tasks
                .iter()
                .map(|t| format!("{}:{}", t.id, t.remaining))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(
                f,
                "display L{} [{}/{}]{} -> [{}]",
                level.level, level.len, capacity, skip, tasks
            )?;
        }
        Ok(())
    }
}

impl Scheduler {
    /// Cumulative counters: turns, minutes worked, tasks completed
    pub fn report(&self) -> RunReport {
        self.report
    }

    /// Pending tasks per level, index = level
    pub fn queue_lengths(&self) -> Vec<usize> {
        self.queues.iter().map(|q| q.len()).collect()
    }

    /// Ids of all pending tasks, by level then FIFO position
    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.queues
            .iter()
            .flat_map(|q| q.iter().map(|t| t.id().clone()))
            .collect()
    }

    /// Level currently holding the task - O(1)
    pub fn location(&self, id: &TaskId) -> Option<Level> {
        self.locations.get(id).copied()
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(|q| q.is_empty())
    }

    /// Work still owed to pending tasks
    pub fn total_remaining(&self) -> Work {
        self.outstanding
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        let levels = self
            .queues
            .iter()
            .map(|q| LevelSnapshot {
                level: q.level(),
                len: q.len(),
                capacity: q.limit(),
                skip_pending: self.skip_flags[q.level()],
                tasks: q
                    .iter()
                    .map(|t| QueuedTask {
                        id: t.id().clone(),
                        remaining: t.remaining_time(),
                        arrival_turn: t.metadata().arrival_turn,
                    })
                    .collect(),
            })
            .collect();

        SchedulerSnapshot {
            report: self.report,
            quantum: self.config.quantum,
            next_level: self.next_level(),
            levels,
        }
    }

    /// Journaled events so far, oldest first (empty when journaling is off)
    pub fn events(&self) -> &[SchedulerEvent] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Take the journaled events, leaving the journal empty
    pub fn drain_events(&mut self) -> Vec<SchedulerEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }
}
