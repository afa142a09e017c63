/*!
 * Scheduler Policy Management
 * Quantum changes and per-level skip flags
 */

use super::types::validate_quantum;
use super::Scheduler;
use crate::core::errors::SchedulerError;
use crate::core::types::{Level, SchedulerResult, Work};
use tracing::debug;

impl Scheduler {
    /// Set the quantum used by `step`, `run` and `run_turns`
    pub fn set_quantum(&mut self, quantum: Work) -> SchedulerResult<()> {
        self.config.quantum = validate_quantum(quantum)?;
        debug!(quantum, "Quantum updated");
        Ok(())
    }

    pub fn quantum(&self) -> Work {
        self.config.quantum
    }

    /// Number of queue levels, fixed at construction
    pub fn levels(&self) -> usize {
        self.queues.len()
    }

    /// Pass over `level` the next time it would be selected
    ///
    /// The flag is one-shot and stays armed while the level is empty.
    pub fn skip_level(&mut self, level: Level) -> SchedulerResult<()> {
        let flag = self
            .skip_flags
            .get_mut(level)
            .ok_or(SchedulerError::UnknownLevel(level))?;
        *flag = true;
        debug!(level, "Level marked for skip");
        Ok(())
    }

    pub fn is_skip_pending(&self, level: Level) -> bool {
        self.skip_flags.get(level).copied().unwrap_or(false)
    }

    pub fn clear_skips(&mut self) {
        self.skip_flags.iter_mut().for_each(|f| *f = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerEvent;
    use crate::scheduler::SchedulerConfig;

    #[test]
    fn test_set_quantum() {
        let mut scheduler = Scheduler::default();
        scheduler.set_quantum(4).unwrap();
        assert_eq!(scheduler.quantum(), 4);
        assert!(scheduler.set_quantum(0).is_err());
        assert_eq!(scheduler.quantum(), 4);
    }

    #[test]
    fn test_skip_unknown_level() {
        let mut scheduler = Scheduler::with_levels(2, 1).unwrap();
        assert_eq!(
            scheduler.skip_level(2).unwrap_err(),
            SchedulerError::UnknownLevel(2)
        );
    }

    #[test]
    fn test_skip_passes_over_level_once() {
        let config = SchedulerConfig::new(2, 1).with_events();
        let mut scheduler = Scheduler::new(config).unwrap();
        scheduler.submit("a", 2).unwrap();
        scheduler.step().unwrap(); // a -> level 1
        scheduler.submit("b", 1).unwrap();

        scheduler.skip_level(0).unwrap();
        assert_eq!(scheduler.next_level(), Some(1));

        let outcome = scheduler.step().unwrap().unwrap();
        assert_eq!(outcome.task_id.as_str(), "a");
        assert_eq!(outcome.level, 1);
        assert!(!scheduler.is_skip_pending(0));

        let outcome = scheduler.step().unwrap().unwrap();
        assert_eq!(outcome.task_id.as_str(), "b");

        let skipped: Vec<_> = scheduler
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SchedulerEvent::Skipped { .. }))
            .collect();
        assert_eq!(skipped, vec![SchedulerEvent::Skipped { turn: 2, level: 0 }]);
    }

    #[test]
    fn test_skip_never_idles() {
        let mut scheduler = Scheduler::new(SchedulerConfig::default().with_events()).unwrap();
        scheduler.submit("a", 1).unwrap();
        scheduler.skip_level(0).unwrap();

        let report = scheduler.run().unwrap();
        assert_eq!(report.turns, 1);
        assert_eq!(report.completed, 1);
        assert!(!scheduler.is_skip_pending(0));

        // The level ran, so the journal must not claim it was passed over
        let events = scheduler.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, SchedulerEvent::Skipped { .. })));
        assert!(matches!(
            events.last(),
            Some(SchedulerEvent::Completed { turn: 1, level: 0, .. })
        ));
    }

    #[test]
    fn test_fallback_keeps_other_skip_flags() {
        let config = SchedulerConfig::new(2, 1).with_events();
        let mut scheduler = Scheduler::new(config).unwrap();
        scheduler.submit("a", 3).unwrap();
        scheduler.step().unwrap(); // a -> level 1
        scheduler.submit("b", 1).unwrap();

        scheduler.skip_level(0).unwrap();
        scheduler.skip_level(1).unwrap();

        // Both levels flagged: level 0 runs, level 1 keeps its flag
        let outcome = scheduler.step().unwrap().unwrap();
        assert_eq!(outcome.task_id.as_str(), "b");
        assert!(!scheduler.is_skip_pending(0));
        assert!(scheduler.is_skip_pending(1));
        assert!(!scheduler
            .drain_events()
            .iter()
            .any(|e| matches!(e, SchedulerEvent::Skipped { .. })));
    }

    #[test]
    fn test_skip_stays_armed_on_empty_level() {
        let mut scheduler = Scheduler::with_levels(2, 1).unwrap();
        scheduler.skip_level(1).unwrap();
        scheduler.submit("a", 1).unwrap();
        scheduler.run().unwrap();
        assert!(scheduler.is_skip_pending(1));

        scheduler.clear_skips();
        assert!(!scheduler.is_skip_pending(1));
    }
}
