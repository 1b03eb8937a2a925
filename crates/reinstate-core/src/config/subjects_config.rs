//! Run numbering and per-subject overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SubjectId;

/// Which run numbers make up a subject's memory, pre-rest, and post-rest runs.
///
/// `rest_run_overrides` maps a bare subject id to the post-encoding rest run
/// it actually used. Subject `141` used rest run 3 instead of rest run 2, so
/// that entry is present by default. The table is consulted once, when
/// inputs are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectsConfig {
    /// Memory (encoding) run number. Default: 1.
    pub memory_run: Option<u32>,
    /// Pre-encoding rest run number. Default: 1.
    pub pre_rest_run: Option<u32>,
    /// Post-encoding rest run number. Default: 2.
    pub post_rest_run: Option<u32>,
    /// Subject id → post-encoding rest run number.
    pub rest_run_overrides: BTreeMap<String, u32>,
}

impl Default for SubjectsConfig {
    fn default() -> Self {
        Self {
            memory_run: None,
            pre_rest_run: None,
            post_rest_run: None,
            rest_run_overrides: BTreeMap::from([("141".to_string(), 3)]),
        }
    }
}

impl SubjectsConfig {
    pub fn effective_memory_run(&self) -> u32 {
        self.memory_run.unwrap_or(1)
    }

    pub fn effective_pre_rest_run(&self) -> u32 {
        self.pre_rest_run.unwrap_or(1)
    }

    /// Post-encoding rest run for `subject`, honoring the override table.
    pub fn effective_post_rest_run(&self, subject: &SubjectId) -> u32 {
        self.rest_run_overrides
            .get(subject.as_str())
            .copied()
            .unwrap_or_else(|| self.post_rest_run.unwrap_or(2))
    }

    /// Overrides from `other` extend (and win over) the existing table.
    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.memory_run.is_some() {
            self.memory_run = other.memory_run;
        }
        if other.pre_rest_run.is_some() {
            self.pre_rest_run = other.pre_rest_run;
        }
        if other.post_rest_run.is_some() {
            self.post_rest_run = other.post_rest_run;
        }
        for (subject, run) in &other.rest_run_overrides {
            self.rest_run_overrides.insert(subject.clone(), *run);
        }
    }
}
