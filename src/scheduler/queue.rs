/*!
 * Task Queue
 * FIFO run queue backed by a ringbuf circular buffer, regrown on full
 */

use super::task::Task;
use crate::core::errors::SchedulerError;
use crate::core::limits::{INITIAL_RING_CAPACITY, RING_GROWTH_FACTOR};
use crate::core::types::{Level, SchedulerResult, TaskId};
use ahash::AHashSet;
use ringbuf::{traits::*, HeapRb};
use tracing::trace;

/// FIFO queue of pending tasks at one level
///
/// # Performance
/// - enqueue/dequeue are O(1) ring index moves; no element shifting
/// - storage doubles only when the ring is full, so growth is amortized O(1)
/// - an id set keeps the no-duplicate check O(1)
pub struct TaskQueue {
    level: Level,
    ring: HeapRb<Task>,
    queued: AHashSet<TaskId>,
    /// Admission limit; requeues from the turn loop ignore it
    limit: Option<usize>,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("level", &self.level)
            .field("len", &self.ring.occupied_len())
            .field("ring_capacity", &self.capacity())
            .field("limit", &self.limit)
            .finish()
    }
}

impl TaskQueue {
    pub fn new(level: Level) -> Self {
        Self::with_limit(level, None)
    }

    pub fn with_limit(level: Level, limit: Option<usize>) -> Self {
        let initial = limit
            .map_or(INITIAL_RING_CAPACITY, |l| l.min(INITIAL_RING_CAPACITY))
            .max(1);

        Self {
            level,
            ring: HeapRb::<Task>::new(initial),
            queued: AHashSet::new(),
            limit,
        }
    }

    /// Append a new task at the tail
    ///
    /// Rejects finished tasks, ids already queued here and, when a limit is
    /// set, admissions into a full queue.
    pub fn enqueue(&mut self, task: Task) -> SchedulerResult<()> {
        if task.is_complete() {
            return Err(SchedulerError::InvalidTask(task.id().clone()));
        }

        if let Some(limit) = self.limit {
            if self.len() >= limit {
                return Err(SchedulerError::QueueFull {
                    level: self.level,
                    capacity: limit,
                });
            }
        }

        self.push(task)
    }

    /// Put a partially-run task back at the tail, bypassing the admission limit
    pub(crate) fn requeue(&mut self, task: Task) -> SchedulerResult<()> {
        if task.is_complete() {
            return Err(SchedulerError::InvalidTask(task.id().clone()));
        }
        self.push(task)
    }

    /// Remove and return the head task
    pub fn dequeue(&mut self) -> SchedulerResult<Task> {
        let task = self
            .ring
            .try_pop()
            .ok_or(SchedulerError::EmptyQueue(self.level))?;
        self.queued.remove(task.id());
        Ok(task)
    }

    pub fn peek(&self) -> Option<&Task> {
        self.ring.iter().next()
    }

    /// Tasks in FIFO order, head first
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.ring.iter()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.queued.contains(id)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    /// Alias of [`len`](Self::len)
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline(always)]
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Current ring storage size (not the admission limit)
    pub fn capacity(&self) -> usize {
        self.ring.capacity().get()
    }

    fn push(&mut self, task: Task) -> SchedulerResult<()> {
        if self.queued.contains(task.id()) {
            return Err(SchedulerError::DuplicateTask(task.id().clone()));
        }

        if self.ring.is_full() {
            self.grow();
        }

        let id = task.id().clone();
        let level = self.level;
        let capacity = self.capacity();
        self.ring
            .try_push(task)
            .map_err(|_| SchedulerError::QueueFull { level, capacity })?;
        self.queued.insert(id);
        Ok(())
    }

    /// Move every task into a ring twice the size, preserving order
    fn grow(&mut self) {
        let new_capacity = self.capacity() * RING_GROWTH_FACTOR;
        let mut grown = HeapRb::<Task>::new(new_capacity);
        grown.push_iter(self.ring.pop_iter());

        trace!(
            level = self.level,
            from = self.capacity(),
            to = new_capacity,
            "Task queue ring grown"
        );
        self.ring = grown;
    }
}
