//! JSON output format for summaries and comparisons
//!
//! `--format json` counterpart of the text reports. Counts and ordering are
//! the same as in the text rendering.

use crate::diff::{OutcomeCount, RunDiff};
use crate::results::{SummaryFile, TestRun};
use serde::{Deserialize, Serialize};

/// Per-outcome counts of one summary file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummaryFile {
    pub path: String,
    pub total: usize,
    pub outcomes: Vec<OutcomeCount>,
}

impl JsonSummaryFile {
    pub fn from_summary(summary: &SummaryFile) -> Self {
        let results = summary.results();
        Self {
            path: summary.path().display().to_string(),
            total: results.len(),
            outcomes: results
                .outcome_counts()
                .into_iter()
                .map(|(outcome, tests)| OutcomeCount { outcome, tests })
                .collect(),
        }
    }
}

/// `summarize` output over one or more runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummaryOutput {
    pub files: Vec<JsonSummaryFile>,
}

impl JsonSummaryOutput {
    pub fn from_runs(runs: &[TestRun]) -> Self {
        Self {
            files: runs
                .iter()
                .flat_map(|run| run.summaries().iter().map(JsonSummaryFile::from_summary))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `compare` output: the diff plus its issue count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCompareOutput {
    pub issue_count: usize,
    #[serde(flatten)]
    pub diff: RunDiff,
}

impl JsonCompareOutput {
    pub fn new(diff: RunDiff) -> Self {
        Self {
            issue_count: diff.issue_count(),
            diff,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
