/*!
 * Scheduler Property Tests
 * Work conservation, termination and FIFO properties over random workloads
 */

use proptest::prelude::*;
use turn_scheduler::{Scheduler, SchedulerConfig};

fn workload() -> impl Strategy<Value = (usize, u64, Vec<u64>)> {
    (
        1usize..5,
        1u64..6,
        proptest::collection::vec(1u64..20, 0..40),
    )
}

proptest! {
    #[test]
    fn prop_work_is_conserved((levels, quantum, times) in workload()) {
        let mut scheduler = Scheduler::with_levels(levels, quantum).unwrap();
        for (i, time) in times.iter().enumerate() {
            scheduler.submit(i as u64, *time).unwrap();
        }

        let owed = scheduler.total_remaining();
        prop_assert_eq!(owed, times.iter().sum::<u64>());

        let report = scheduler.run().unwrap();
        prop_assert_eq!(report.minutes_worked, owed);
        prop_assert_eq!(report.completed, times.len() as u64);
        prop_assert!(scheduler.is_empty());
        prop_assert_eq!(scheduler.len(), 0);
    }

    #[test]
    fn prop_turn_count_matches_slices((levels, quantum, times) in workload()) {
        let mut scheduler = Scheduler::with_levels(levels, quantum).unwrap();
        for (i, time) in times.iter().enumerate() {
            scheduler.submit(i as u64, *time).unwrap();
        }

        // Each task needs ceil(time / quantum) turns regardless of level layout
        let expected: u64 = times.iter().map(|t| t.div_ceil(quantum)).sum();
        let report = scheduler.run().unwrap();
        prop_assert_eq!(report.turns, expected);
    }

    #[test]
    fn prop_every_pending_task_has_one_home((levels, quantum, times) in workload(), turns in 1u64..30) {
        let config = SchedulerConfig::new(levels, quantum);
        let mut scheduler = Scheduler::new(config).unwrap();
        for (i, time) in times.iter().enumerate() {
            scheduler.submit(i as u64, *time).unwrap();
        }
        scheduler.run_turns(turns).unwrap();

        let pending = scheduler.pending_ids();
        prop_assert_eq!(pending.len(), scheduler.len());
        prop_assert_eq!(scheduler.queue_lengths().iter().sum::<usize>(), pending.len());
        for id in &pending {
            prop_assert!(scheduler.location(id).is_some());
        }
    }

    #[test]
    fn prop_fifo_when_quantum_covers_all(times in proptest::collection::vec(1u64..10, 1..20)) {
        let quantum = *times.iter().max().unwrap();
        let mut scheduler = Scheduler::round_robin(quantum).unwrap();
        for (i, time) in times.iter().enumerate() {
            scheduler.submit(i as u64, *time).unwrap();
        }

        let mut order = Vec::new();
        while let Some(outcome) = scheduler.step().unwrap() {
            prop_assert!(outcome.is_completion());
            order.push(outcome.task_id.to_string());
        }
        let expected: Vec<String> = (0..times.len()).map(|i| i.to_string()).collect();
        prop_assert_eq!(order, expected);
    }
}
