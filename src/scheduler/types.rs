/*!
 * Scheduler Types
 * Configuration, turn outcomes and run reports
 */

use crate::core::errors::SchedulerError;
use crate::core::limits::{
    DEFAULT_LEVELS, DEFAULT_QUANTUM, ENV_LEVELS, ENV_QUANTUM, ENV_QUEUE_CAPACITY,
    ENV_RECORD_EVENTS, MAX_LEVELS,
};
use crate::core::types::{Level, SchedulerResult, TaskId, Turn, Work};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scheduler construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Number of queue levels; 1 is plain round robin
    pub levels: usize,
    /// Work units applied per turn
    pub quantum: Work,
    /// Admission limit per queue (None = unbounded)
    pub queue_capacity: Option<usize>,
    /// Keep a journal of scheduler events for drain_events()
    pub record_events: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            quantum: DEFAULT_QUANTUM,
            queue_capacity: None,
            record_events: false,
        }
    }
}

impl SchedulerConfig {
    pub fn new(levels: usize, quantum: Work) -> Self {
        Self {
            levels,
            quantum,
            ..Self::default()
        }
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_quantum(mut self, quantum: Work) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn with_events(mut self) -> Self {
        self.record_events = true;
        self
    }

    /// Load defaults overridden by `TURNSCHED_*` environment variables
    ///
    /// Environment variables:
    /// - TURNSCHED_LEVELS: queue level count (default: 1)
    /// - TURNSCHED_QUANTUM: work units per turn (default: 1)
    /// - TURNSCHED_QUEUE_CAPACITY: admission limit per queue (default: unbounded)
    /// - TURNSCHED_RECORD_EVENTS: "1"/"true" to keep an event journal
    pub fn from_env() -> SchedulerResult<Self> {
        let mut config = Self::default();

        if let Some(levels) = env_parse::<usize>(ENV_LEVELS)? {
            config.levels = levels;
        }
        if let Some(quantum) = env_parse::<Work>(ENV_QUANTUM)? {
            config.quantum = quantum;
        }
        if let Some(capacity) = env_parse::<usize>(ENV_QUEUE_CAPACITY)? {
            config.queue_capacity = Some(capacity);
        }
        if let Ok(v) = std::env::var(ENV_RECORD_EVENTS) {
            config.record_events = v == "1" || v.eq_ignore_ascii_case("true");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SchedulerResult<()> {
        if self.levels == 0 {
            return Err(invalid("queue level count must be at least 1"));
        }
        if self.levels > MAX_LEVELS {
            return Err(invalid(format!(
                "queue level count {} exceeds maximum ({})",
                self.levels, MAX_LEVELS
            )));
        }
        validate_quantum(self.quantum)?;
        if self.queue_capacity == Some(0) {
            return Err(invalid("queue capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Validate a quantum value
#[inline(always)]
pub fn validate_quantum(quantum: Work) -> SchedulerResult<Work> {
    if quantum == 0 {
        #[cold]
        #[inline(never)]
        fn make_error() -> SchedulerError {
            invalid("quantum must be a positive number of work units")
        }
        Err(make_error())
    } else {
        Ok(quantum)
    }
}

fn invalid(msg: impl Into<String>) -> SchedulerError {
    SchedulerError::InvalidConfiguration(msg.into())
}

fn env_parse<T: FromStr>(key: &str) -> SchedulerResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(format!("{}={:?} is not a valid number", key, raw))),
        Err(_) => Ok(None),
    }
}

/// What happened to the task after its slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Disposition {
    /// Back to PENDING, at the tail of `level`
    Requeued { level: Level },
    /// Terminal; the task has been dropped
    Completed,
}

/// Result of a single turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TurnOutcome {
    /// 1-based number of this turn
    pub turn: Turn,
    pub task_id: TaskId,
    /// Level the task was taken from
    pub level: Level,
    /// Work charged this turn
    pub work: Work,
    pub remaining: Work,
    pub disposition: Disposition,
}

impl TurnOutcome {
    pub fn is_completion(&self) -> bool {
        self.disposition == Disposition::Completed
    }
}

/// Cumulative scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunReport {
    pub turns: Turn,
    pub minutes_worked: Work,
    pub completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_round_robin() {
        let config = SchedulerConfig::default();
        assert_eq!(config.levels, 1);
        assert_eq!(config.quantum, 1);
        assert_eq!(config.queue_capacity, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(SchedulerConfig::new(0, 1).validate().is_err());
        assert!(SchedulerConfig::new(1, 0).validate().is_err());
        assert!(SchedulerConfig::new(MAX_LEVELS + 1, 1).validate().is_err());
        assert!(SchedulerConfig::new(3, 2)
            .with_queue_capacity(0)
            .validate()
            .is_err());
        assert!(SchedulerConfig::new(3, 2)
            .with_queue_capacity(4)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"quantum": 3}"#).unwrap();
        assert_eq!(config, SchedulerConfig::new(1, 3));
    }

    #[test]
    fn test_validate_quantum() {
        assert_eq!(validate_quantum(4).unwrap(), 4);
        assert!(matches!(
            validate_quantum(0),
            Err(SchedulerError::InvalidConfiguration(_))
        ));
    }
}
