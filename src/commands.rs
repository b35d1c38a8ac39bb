//! Driver-facing operations: compare, dump, find, summarize, verify, baseline
//!
//! Every operation loads all of its runs before writing anything, so an
//! unreadable input never leaves a half-written report behind.

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::diff::compare_runs;
use crate::json_output::{JsonCompareOutput, JsonSummaryOutput};
use crate::report::TextReporter;
use crate::results::{companion_path, mismatch_line, TestRun};
use crate::revision::{find_previous_revision, ArchiveLayout};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

fn load_run(path: &Path, config: &Config) -> Result<TestRun> {
    TestRun::from_path(path, config)
        .with_context(|| format!("Failed to load test run from {}", path.display()))
}

fn load_runs(paths: &[PathBuf], config: &Config) -> Result<Vec<TestRun>> {
    paths.iter().map(|p| load_run(p, config)).collect()
}

/// Compare `before` with `after`; returns the issue count.
pub fn compare<W: Write>(
    before: &Path,
    after: &Path,
    config: &Config,
    format: OutputFormat,
    mut out: W,
) -> Result<usize> {
    let run_a = load_run(before, config)?;
    let run_b = load_run(after, config)?;
    let diff = compare_runs(&run_a, &run_b);
    let issues = diff.issue_count();

    match format {
        OutputFormat::Text => {
            let mut tr = TextReporter::new(out);
            diff.render(&mut tr, &config.summary_extension);
            tr.finish().context("Failed to write report")?;
        }
        OutputFormat::Json => {
            let json = JsonCompareOutput::new(diff).to_json()?;
            writeln!(out, "{}", json)?;
        }
    }

    tracing::info!(
        "{} -> {}: {} issue(s)",
        before.display(),
        after.display(),
        issues
    );
    Ok(issues)
}

/// Print every test of every summary file, grouped by outcome.
pub fn dump<W: Write>(paths: &[PathBuf], config: &Config, out: W) -> Result<()> {
    let runs = load_runs(paths, config)?;
    let mut tr = TextReporter::new(out);
    for run in &runs {
        run.dump(&mut tr);
    }
    tr.finish().context("Failed to write report")?;
    Ok(())
}

/// Locate `testname` across all runs; returns the number of matches.
pub fn find<W: Write>(
    testname: &str,
    paths: &[PathBuf],
    config: &Config,
    with_companion: bool,
    out: W,
) -> Result<usize> {
    let mut runs = load_runs(paths, config)?;
    let mut tr = TextReporter::new(out);
    let count: usize = runs
        .iter_mut()
        .map(|run| run.find(testname, &mut tr, with_companion, config.check_consistency))
        .sum();
    tr.finish().context("Failed to write report")?;
    Ok(count)
}

/// Print per-outcome counts for every summary file.
pub fn summarize<W: Write>(
    paths: &[PathBuf],
    config: &Config,
    format: OutputFormat,
    mut out: W,
) -> Result<()> {
    let runs = load_runs(paths, config)?;
    match format {
        OutputFormat::Text => {
            let mut tr = TextReporter::new(out);
            for run in &runs {
                run.summarize(&mut tr);
            }
            tr.finish().context("Failed to write report")?;
        }
        OutputFormat::Json => {
            let json = JsonSummaryOutput::from_runs(&runs).to_json()?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

/// Report every summary/log outcome disagreement; returns their number.
///
/// Every summary's companion log must be readable.
pub fn verify<W: Write>(paths: &[PathBuf], config: &Config, out: W) -> Result<usize> {
    let mut runs = load_runs(paths, config)?;
    let mut found = Vec::new();
    let mut files = 0;
    for run in &mut runs {
        let per_file = run
            .mismatches()
            .with_context(|| format!("Failed to load detail logs under {}", run.root().display()))?;
        files += per_file.len();
        found.extend(per_file);
    }

    let mut tr = TextReporter::new(out);
    let mut total = 0;
    for (path, mismatches) in &found {
        if mismatches.is_empty() {
            continue;
        }
        total += mismatches.len();
        let log_path = companion_path(path, &config.log_extension);
        let mut section = tr.section(format!(
            "Outcome mismatches in {}: {}",
            path.display(),
            mismatches.len()
        ));
        for m in mismatches {
            section.writeln(&mismatch_line(&log_path, path, m));
        }
    }
    if total == 0 {
        tr.writeln(&format!(
            "No outcome mismatches in {} .{} files",
            files, config.summary_extension
        ));
    }
    tr.finish().context("Failed to write report")?;
    Ok(total)
}

/// Select the baseline revision for `commit`, optionally comparing against it.
///
/// Archived `.xz` summaries are decompressed to temporary files for the
/// comparison. Returns the issue count of the comparison, or 0 when only
/// selecting or when no older revision is archived.
pub fn baseline<W: Write>(
    layout: &ArchiveLayout,
    commit: u64,
    run_compare: bool,
    config: &Config,
    format: OutputFormat,
    mut out: W,
) -> Result<usize> {
    let dir = layout.directory();
    let Some(previous) = find_previous_revision(&dir, &config.summary_extension, commit)? else {
        writeln!(out, "No baseline for r{}: nothing to do, first commit", commit)?;
        return Ok(0);
    };

    let extension = &config.summary_extension;
    if !run_compare {
        writeln!(out, "{}", layout.stored_path(previous, extension).display())?;
        return Ok(0);
    }

    // Both handles stay alive until the comparison is done.
    let before = layout
        .open_summary(previous, extension)
        .with_context(|| format!("Failed to open baseline r{}", previous))?;
    let after = layout
        .open_summary(commit, extension)
        .with_context(|| format!("Failed to open r{}", commit))?;
    compare(before.path(), after.path(), config, format, out)
}
