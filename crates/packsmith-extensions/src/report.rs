//! Failure aggregation
//!
//! Groups and their entries keep first-seen order, so a report reads in the
//! order failures actually happened.

use crate::executor::TaskOutcome;
use serde::Serialize;

/// Failures sharing a grouping key such as `fabric/1.20.1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureGroup {
    pub key: String,
    pub entries: Vec<String>,
}

/// Insertion-ordered failures by group. Empty means the run fully succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureReport {
    groups: Vec<FailureGroup>,
}

impl FailureReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` under `key`, creating the group on first use
    pub fn record(&mut self, key: impl Into<String>, entry: impl Into<String>) {
        let key = key.into();
        let entry = entry.into();
        match self.groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.entries.push(entry),
            None => self.groups.push(FailureGroup {
                key,
                entries: vec![entry],
            }),
        }
    }

    /// Record `outcome` if it failed; successes are ignored
    pub fn record_outcome(&mut self, outcome: &TaskOutcome) {
        if !outcome.success {
            self.record(outcome.item.group.clone(), outcome.item.label());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of failure entries across groups
    pub fn failure_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn groups(&self) -> &[FailureGroup] {
        &self.groups
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.entries.as_slice())
    }
}
