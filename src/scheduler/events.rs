/*!
 * Scheduler Events
 * Journal of admissions, slices, completions and skips
 */

use crate::core::types::{Level, TaskId, Turn, Work};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event recorded by the scheduler when journaling is enabled
///
/// `turn` is the turn counter at the time of the event: admissions carry the
/// number of turns already run, slice events carry their own 1-based turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    Admitted {
        turn: Turn,
        task: TaskId,
        level: Level,
        remaining: Work,
    },
    Worked {
        turn: Turn,
        task: TaskId,
        level: Level,
        work: Work,
        remaining: Work,
        requeued_to: Level,
    },
    Completed {
        turn: Turn,
        task: TaskId,
        level: Level,
        work: Work,
    },
    Skipped {
        turn: Turn,
        level: Level,
    },
}

impl SchedulerEvent {
    pub fn turn(&self) -> Turn {
        match self {
            Self::Admitted { turn, .. }
            | Self::Worked { turn, .. }
            | Self::Completed { turn, .. }
            | Self::Skipped { turn, .. } => *turn,
        }
    }

    pub fn task(&self) -> Option<&TaskId> {
        match self {
            Self::Admitted { task, .. }
            | Self::Worked { task, .. }
            | Self::Completed { task, .. } => Some(task),
            Self::Skipped { .. } => None,
        }
    }
}

impl fmt::Display for SchedulerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admitted {
                turn,
                task,
                level,
                remaining,
            } => write!(
                f,
                "turn={} event=enqueue level={} task={} remaining={}",
                turn, level, task, remaining
            ),
            Self::Worked {
                turn,
                task,
                level,
                work,
                remaining,
                requeued_to,
            } => write!(
                f,
                "turn={} event=work level={} task={} work={} remaining={} requeued_to={}",
                turn, level, task, work, remaining, requeued_to
            ),
            Self::Completed {
                turn,
                task,
                level,
                work,
            } => write!(
                f,
                "turn={} event=finish level={} task={} work={}",
                turn, level, task, work
            ),
            Self::Skipped { turn, level } => {
                write!(f, "turn={} event=skip level={}", turn, level)
            }
        }
    }
}
