/*!
 * Core Types
 * Common types used across the scheduler
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;

/// Abstract unit of work ("minutes"), decremented once per turn
pub type Work = u64;

/// Queue level index (0 is the highest priority)
pub type Level = usize;

/// Turn counter type
pub type Turn = u64;

/// Common result type for scheduler operations
pub type SchedulerResult<T> = Result<T, super::errors::SchedulerError>;

/// Stable task identifier
///
/// Short ids such as `"front-001"` are stored inline without allocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(SmartString);

impl TaskId {
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmartString::from(id.as_ref()))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(SmartString::from(s))
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self(SmartString::from(n.to_string()))
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_conversions() {
        assert_eq!(TaskId::from("front-001").as_str(), "front-001");
        assert_eq!(TaskId::from(42u64), TaskId::from("42"));
        assert_eq!(TaskId::from(String::from("x")).to_string(), "x");
    }

    #[test]
    fn test_task_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&TaskId::from("t1")).unwrap();
        assert_eq!(json, "\"t1\"");
    }
}
