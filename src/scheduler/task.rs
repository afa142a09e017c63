/*!
 * Scheduler Task
 * Unit of work with a remaining-time budget
 */

use crate::core::types::{TaskId, Turn, Work};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reporting attributes carried with a task
///
/// Never read by the turn loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskMetadata {
    /// Work the task was created with
    pub total_time: Work,
    /// Turn counter value when the scheduler admitted the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_turn: Option<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, String>,
}

/// Runnable work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    remaining: Work,
    metadata: TaskMetadata,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, remaining_time: Work) -> Self {
        Self {
            id: id.into(),
            remaining: remaining_time,
            metadata: TaskMetadata {
                total_time: remaining_time,
                ..TaskMetadata::default()
            },
        }
    }

    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.metadata.label = Some(label.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.attributes.insert(key.into(), value.into());
        self
    }

    #[inline(always)]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[inline(always)]
    pub fn remaining_time(&self) -> Work {
        self.remaining
    }

    pub fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// A task with no work left is complete and must not be queued again
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Apply one slice of work, returning what was actually charged
    ///
    /// Never charges more than the remaining time.
    pub(crate) fn run_slice(&mut self, quantum: Work) -> Work {
        let work = quantum.min(self.remaining);
        self.remaining -= work;
        work
    }

    pub(crate) fn mark_arrival(&mut self, turn: Turn) {
        self.metadata.arrival_turn = Some(turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_records_total_time() {
        let task = Task::new("t1", 5);
        assert_eq!(task.remaining_time(), 5);
        assert_eq!(task.metadata().total_time, 5);
        assert_eq!(task.metadata().arrival_turn, None);
        assert!(!task.is_complete());
    }

    #[test]
    fn test_run_slice_never_overcharges() {
        let mut task = Task::new("t1", 3);
        assert_eq!(task.run_slice(2), 2);
        assert_eq!(task.remaining_time(), 1);

        assert_eq!(task.run_slice(2), 1);
        assert_eq!(task.remaining_time(), 0);
        assert!(task.is_complete());

        assert_eq!(task.run_slice(2), 0);
    }

    #[test]
    fn test_metadata_builders() {
        let task = Task::new("t1", 2)
            .with_label("latte")
            .with_attribute("lane", "front");

        assert_eq!(task.metadata().label.as_deref(), Some("latte"));
        assert_eq!(
            task.metadata().attributes.get("lane").map(String::as_str),
            Some("front")
        );
        assert_eq!(task.metadata().total_time, 2);
    }
}
