/*!
 * Scheduler Limits and Defaults
 *
 * Centralized location for scheduler defaults and bounds.
 */

// =============================================================================
// SCHEDULER DEFAULTS
// =============================================================================

/// Default work units applied to a task per turn
pub const DEFAULT_QUANTUM: u64 = 1;

/// Default number of queue levels (plain round robin)
pub const DEFAULT_LEVELS: usize = 1;

/// Upper bound on queue levels
/// Each level owns a ring buffer, so this caps idle allocation
pub const MAX_LEVELS: usize = 64;

// =============================================================================
// QUEUE STORAGE
// =============================================================================

/// Initial ring capacity for a queue with no admission limit
/// [PERF] Small enough to keep idle levels cheap, doubled on demand
pub const INITIAL_RING_CAPACITY: usize = 8;

/// Ring growth factor when a queue is full
pub const RING_GROWTH_FACTOR: usize = 2;

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_LEVELS: &str = "TURNSCHED_LEVELS";
pub const ENV_QUANTUM: &str = "TURNSCHED_QUANTUM";
pub const ENV_QUEUE_CAPACITY: &str = "TURNSCHED_QUEUE_CAPACITY";
pub const ENV_RECORD_EVENTS: &str = "TURNSCHED_RECORD_EVENTS";
pub const ENV_TRACE_JSON: &str = "TURNSCHED_TRACE_JSON";
