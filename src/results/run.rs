// A test run: every summary file under one root
//
// Files are kept sorted by path string so every report over a run comes out
// in the same order regardless of directory iteration order.

use crate::config::Config;
use crate::report::TextReporter;
use crate::results::{OutcomeMismatch, Result, ResultsError, SummaryFile};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collection of summary files discovered under a root path
#[derive(Debug, Clone)]
pub struct TestRun {
    root: PathBuf,
    summaries: Vec<SummaryFile>,
}

impl TestRun {
    /// Build a run from a single summary file or a directory tree.
    ///
    /// A file root that lacks the summary extension yields an empty run.
    pub fn from_path<P: AsRef<Path>>(root: P, config: &Config) -> Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ResultsError::NotFound(root.to_path_buf())
            } else {
                ResultsError::Read {
                    path: root.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut summaries = Vec::new();
        if metadata.is_dir() {
            for entry in WalkDir::new(root) {
                let entry = entry.map_err(|source| ResultsError::Walk {
                    root: root.to_path_buf(),
                    source,
                })?;
                // `Path::is_file` follows a symlinked summary to its target.
                if has_extension(entry.path(), &config.summary_extension)
                    && entry.path().is_file()
                {
                    summaries.push(SummaryFile::from_file(
                        entry.path(),
                        &config.log_extension,
                    )?);
                }
            }
        } else if has_extension(root, &config.summary_extension) {
            summaries.push(SummaryFile::from_file(root, &config.log_extension)?);
        } else {
            tracing::warn!(
                "{} is not a .{} file, nothing to load",
                root.display(),
                config.summary_extension
            );
        }

        summaries.sort_by_cached_key(sort_key);
        tracing::debug!(
            "Discovered {} summary file(s) under {}",
            summaries.len(),
            root.display()
        );

        Ok(Self {
            root: root.to_path_buf(),
            summaries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Summary files in sorted path order
    pub fn summaries(&self) -> &[SummaryFile] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Path of `summary` relative to the run root; `.` for a single-file run.
    pub fn relative_path(&self, summary: &SummaryFile) -> String {
        self.relative_key(summary).to_string_lossy().into_owned()
    }

    /// Exact relative path, distinct for every summary even when not UTF-8.
    pub fn relative_key(&self, summary: &SummaryFile) -> OsString {
        match summary.path().strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => OsString::from("."),
            Ok(rel) => rel.as_os_str().to_os_string(),
            Err(_) => summary.path().as_os_str().to_os_string(),
        }
    }

    /// Relative path -> summary file, for pairing two runs structurally.
    pub fn relative_index(&self) -> BTreeMap<OsString, &SummaryFile> {
        self.summaries
            .iter()
            .map(|sf| (self.relative_key(sf), sf))
            .collect()
    }

    /// Total hits for `identity` over every summary file.
    ///
    /// With `with_companion`, each summary hit is followed up in its log.
    pub fn find<W: Write>(
        &mut self,
        identity: &str,
        tr: &mut TextReporter<W>,
        with_companion: bool,
        check_consistency: bool,
    ) -> usize {
        self.summaries
            .iter_mut()
            .map(|sf| {
                if with_companion {
                    sf.find_with_companion(identity, tr, check_consistency)
                } else {
                    sf.find(identity, tr)
                }
            })
            .sum()
    }

    pub fn dump<W: Write>(&self, tr: &mut TextReporter<W>) {
        for sf in &self.summaries {
            sf.dump(tr);
        }
    }

    pub fn summarize<W: Write>(&self, tr: &mut TextReporter<W>) {
        for sf in &self.summaries {
            sf.summarize(tr);
        }
    }

    /// Summary/log disagreements for every summary file, in path order.
    ///
    /// Fails on the first companion log that cannot be read.
    pub fn mismatches(&mut self) -> Result<Vec<(PathBuf, Vec<OutcomeMismatch>)>> {
        self.summaries
            .iter_mut()
            .map(|sf| -> Result<(PathBuf, Vec<OutcomeMismatch>)> {
                let found = sf.mismatches()?;
                Ok((sf.path().to_path_buf(), found))
            })
            .collect()
    }
}

fn sort_key(summary: &SummaryFile) -> OsString {
    summary.path().as_os_str().to_os_string()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension() == Some(OsStr::new(extension))
}
