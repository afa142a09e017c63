/*!
 * Menu and Task Factory
 * Turns named orders into tasks with per-lane sequential ids
 */

use crate::core::errors::SchedulerError;
use crate::core::types::{SchedulerResult, Work};
use crate::scheduler::Task;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Item name -> work units needed to prepare it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    items: BTreeMap<String, Work>,
}

impl Menu {
    pub fn empty() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// The house menu
    pub fn standard() -> Self {
        let mut menu = Self::empty();
        for (name, burst) in [
            ("americano", 2),
            ("latte", 3),
            ("cappuccino", 3),
            ("mocha", 4),
            ("tea", 1),
            ("macchiato", 2),
            ("hot_chocolate", 4),
        ] {
            menu.items.insert(name.to_string(), burst);
        }
        menu
    }

    /// Add or replace an item; zero-time items could never be queued
    pub fn register(&mut self, name: impl Into<String>, burst: Work) -> SchedulerResult<()> {
        let name = name.into();
        if burst == 0 {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "menu item '{}' needs a positive preparation time",
                name
            )));
        }
        self.items.insert(name, burst);
        Ok(())
    }

    pub fn burst(&self, item: &str) -> SchedulerResult<Work> {
        self.items
            .get(item)
            .copied()
            .ok_or_else(|| SchedulerError::UnknownItem(item.to_string()))
    }

    /// Items in name order
    pub fn items(&self) -> impl Iterator<Item = (&str, Work)> + '_ {
        self.items.iter().map(|(name, burst)| (name.as_str(), *burst))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .items()
            .map(|(name, burst)| format!("{}:{}", name, burst))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "menu=[{}]", items)
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builds tasks from `(lane, item)` orders
///
/// Ids look like `front-001`. A lane's sequence number is consumed even when
/// the order is rejected, so ids stay stable across retries.
#[derive(Debug, Clone, Default)]
pub struct TaskFactory {
    menu: Menu,
    counters: AHashMap<String, u32>,
}

impl TaskFactory {
    pub fn new(menu: Menu) -> Self {
        Self {
            menu,
            counters: AHashMap::new(),
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn order(&mut self, lane: &str, item: &str) -> SchedulerResult<Task> {
        let counter = self.counters.entry(lane.to_string()).or_insert(0);
        *counter += 1;
        let id = format!("{}-{:03}", lane, counter);

        let burst = self.menu.burst(item)?;
        Ok(Task::new(id, burst)
            .with_label(item)
            .with_attribute("lane", lane))
    }

    /// Parse a `lane:item` order; a bare item goes to the `default` lane
    pub fn order_spec(&mut self, spec: &str) -> SchedulerResult<Task> {
        match spec.split_once(':') {
            Some((lane, item)) => self.order(lane.trim(), item.trim()),
            None => self.order("default", spec.trim()),
        }
    }
}
