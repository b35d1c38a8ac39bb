//! Before/after comparison of two test runs
//!
//! Summary files are paired by their path relative to each run's root.
//! Every unpaired file, every test present on only one side and every test
//! whose outcome changed counts as one issue. All lists are sorted, so the
//! rendered report is stable between invocations.

use crate::report::TextReporter;
use crate::results::{count_line, DejaFile, Outcome, SummaryFile, TestRun};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Outcome breakdown of a summary file that exists in only one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub relative_path: String,
    pub path: PathBuf,
    pub counts: Vec<OutcomeCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub outcome: Outcome,
    pub tests: usize,
}

/// A test seen in only one of the two runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub identity: String,
    pub outcome: Outcome,
}

/// A test whose outcome differs between the runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeChange {
    pub identity: String,
    pub before: Outcome,
    pub after: Outcome,
}

/// Per-test differences for one pair of summary files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub relative_path: String,
    pub went_away: Vec<TestOutcome>,
    pub appeared: Vec<TestOutcome>,
    pub changed: Vec<OutcomeChange>,
}

impl FileDiff {
    pub fn issue_count(&self) -> usize {
        self.went_away.len() + self.appeared.len() + self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issue_count() == 0
    }
}

/// Full comparison of a "before" run against an "after" run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiff {
    /// Files only in the before run
    pub disappeared: Vec<FileSummary>,
    /// Files only in the after run
    pub appeared: Vec<FileSummary>,
    /// Relative paths present in both runs
    pub common: Vec<String>,
    /// Common files with at least one difference
    pub files: Vec<FileDiff>,
}

impl RunDiff {
    pub fn issue_count(&self) -> usize {
        self.disappeared.len()
            + self.appeared.len()
            + self.files.iter().map(FileDiff::issue_count).sum::<usize>()
    }

    /// Render the hierarchical text report.
    ///
    /// `summary_extension` is only used in section titles.
    pub fn render<W: Write>(&self, tr: &mut TextReporter<W>, summary_extension: &str) {
        render_file_summaries(
            tr,
            &format!("{} files that went away", summary_extension),
            &self.disappeared,
        );
        render_file_summaries(
            tr,
            &format!("{} files that appeared", summary_extension),
            &self.appeared,
        );

        {
            let mut section = tr.section(format!(
                "Comparing {} common .{} files",
                self.common.len(),
                summary_extension
            ));
            for relpath in &self.common {
                section.writeln(relpath);
            }
        }

        for file in &self.files {
            if !file.went_away.is_empty() {
                let mut section = tr.section(format!(
                    "Tests that went away in {}: {}",
                    file.relative_path,
                    file.went_away.len()
                ));
                for test in &file.went_away {
                    section.writeln(&format!("{}: {}", test.outcome, test.identity));
                }
            }

            if !file.appeared.is_empty() {
                let mut section = tr.section(format!(
                    "Tests appeared in {}: {}",
                    file.relative_path,
                    file.appeared.len()
                ));
                for test in &file.appeared {
                    section.writeln(&format!("{}: {}", test.outcome, test.identity));
                }
            }

            if !file.changed.is_empty() {
                let mut section = tr.section(format!(
                    "Tests changing outcome in {}: {}",
                    file.relative_path,
                    file.changed.len()
                ));
                for change in &file.changed {
                    section.writeln(&format!(
                        "{} -> {} : {}",
                        change.before, change.after, change.identity
                    ));
                }
            }
        }

        if !self.common.is_empty() && self.issue_count() == 0 {
            tr.writeln(&format!(
                "No differences found in {} common .{} files",
                self.common.len(),
                summary_extension
            ));
        }
    }
}

fn render_file_summaries<W: Write>(tr: &mut TextReporter<W>, title: &str, files: &[FileSummary]) {
    if files.is_empty() {
        return;
    }
    let mut section = tr.section(format!("{}: {}", title, files.len()));
    for file in files {
        let mut inner = section.section(file.path.display().to_string());
        for count in &file.counts {
            inner.writeln(&count_line(count.outcome, count.tests));
        }
    }
}

fn file_summary(relative_path: &str, summary: &SummaryFile) -> FileSummary {
    FileSummary {
        relative_path: relative_path.to_string(),
        path: summary.path().to_path_buf(),
        counts: summary
            .results()
            .outcome_counts()
            .into_iter()
            .map(|(outcome, tests)| OutcomeCount { outcome, tests })
            .collect(),
    }
}

/// Compare the tests of two parsed files.
pub fn compare_files(relative_path: &str, before: &DejaFile, after: &DejaFile) -> FileDiff {
    let mut diff = FileDiff {
        relative_path: relative_path.to_string(),
        ..FileDiff::default()
    };

    for (identity, old) in before.records() {
        match after.outcome(identity) {
            None => diff.went_away.push(TestOutcome {
                identity: identity.to_string(),
                outcome: old.outcome,
            }),
            Some(new) if new != old.outcome => diff.changed.push(OutcomeChange {
                identity: identity.to_string(),
                before: old.outcome,
                after: new,
            }),
            Some(_) => {}
        }
    }

    for (identity, new) in after.records() {
        if !before.contains(identity) {
            diff.appeared.push(TestOutcome {
                identity: identity.to_string(),
                outcome: new.outcome,
            });
        }
    }

    diff
}

/// Compare two runs. Neither run is modified.
pub fn compare_runs(before: &TestRun, after: &TestRun) -> RunDiff {
    let index_a = before.relative_index();
    let index_b = after.relative_index();

    let disappeared: Vec<FileSummary> = index_a
        .iter()
        .filter(|(relpath, _)| !index_b.contains_key(*relpath))
        .map(|(relpath, sf)| file_summary(&relpath.to_string_lossy(), sf))
        .collect();
    let appeared: Vec<FileSummary> = index_b
        .iter()
        .filter(|(relpath, _)| !index_a.contains_key(*relpath))
        .map(|(relpath, sf)| file_summary(&relpath.to_string_lossy(), sf))
        .collect();

    let mut common = Vec::new();
    let mut files = Vec::new();
    for (relpath, sf_a) in &index_a {
        let Some(sf_b) = index_b.get(relpath) else {
            continue;
        };
        let relpath = relpath.to_string_lossy();
        let file = compare_files(&relpath, sf_a.results(), sf_b.results());
        common.push(relpath.into_owned());
        if !file.is_empty() {
            files.push(file);
        }
    }

    let diff = RunDiff {
        disappeared,
        appeared,
        common,
        files,
    };
    tracing::debug!(
        "Compared {} with {}: {} common file(s), {} issue(s)",
        before.root().display(),
        after.root().display(),
        diff.common.len(),
        diff.issue_count()
    );
    diff
}
