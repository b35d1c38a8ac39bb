// Line scanner for DejaGnu .sum and .log files
//
// Both file kinds share one grammar: a line starting with "<OUTCOME>: " is a
// result line, the rest of the line (trailing whitespace stripped) is the
// test identity. Everything else is ignored.

use crate::report::TextReporter;
use crate::results::{Outcome, Result, ResultsError};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Where and how a test was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestRecord {
    pub outcome: Outcome,
    /// 1-based line number of the result line
    pub line: usize,
}

/// One parsed DejaGnu output file
///
/// Holds the identity -> record map and a per-outcome index of identities.
/// The index is always a partition of the map's keys.
#[derive(Debug, Clone)]
pub struct DejaFile {
    path: PathBuf,
    records: BTreeMap<String, TestRecord>,
    by_outcome: BTreeMap<Outcome, BTreeSet<String>>,
}

/// A detail log parsed with the same grammar as a summary
pub type LogFile = DejaFile;

impl DejaFile {
    /// Parse the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ResultsError::NotFound(path.to_path_buf())
            } else {
                ResultsError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Parse from any buffered reader; `path` is only used for locator lines.
    ///
    /// Lines are decoded lossily so stray non-UTF-8 bytes in diagnostic
    /// output never abort a parse.
    pub fn from_reader<R: BufRead>(path: impl Into<PathBuf>, mut reader: R) -> Result<Self> {
        let mut file = DejaFile {
            path: path.into(),
            records: BTreeMap::new(),
            by_outcome: BTreeMap::new(),
        };

        let mut buf = Vec::new();
        let mut lineno = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ResultsError::Read {
                    path: file.path.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            let decoded = String::from_utf8_lossy(&buf);
            let chunk = decoded.strip_suffix('\n').unwrap_or(decoded.as_ref());
            let chunk = chunk.strip_suffix('\r').unwrap_or(chunk);

            // A bare carriage return (progress output) also ends a line.
            for line in chunk.split('\r') {
                lineno += 1;
                if let Some((outcome, rest)) = Outcome::split_result_line(line) {
                    file.insert(rest.trim_end().to_string(), outcome, lineno);
                }
            }
        }

        tracing::debug!(
            "Parsed {} results from {} ({} lines)",
            file.records.len(),
            file.path.display(),
            lineno
        );
        Ok(file)
    }

    // A repeated identity keeps its last occurrence.
    fn insert(&mut self, identity: String, outcome: Outcome, line: usize) {
        if let Some(previous) = self
            .records
            .insert(identity.clone(), TestRecord { outcome, line })
        {
            if let Some(set) = self.by_outcome.get_mut(&previous.outcome) {
                set.remove(&identity);
                if set.is_empty() {
                    self.by_outcome.remove(&previous.outcome);
                }
            }
        }
        self.by_outcome.entry(outcome).or_default().insert(identity);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&TestRecord> {
        self.records.get(identity)
    }

    pub fn outcome(&self, identity: &str) -> Option<Outcome> {
        self.records.get(identity).map(|r| r.outcome)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    /// All identities, sorted
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// `(identity, record)` pairs sorted by identity
    pub fn records(&self) -> impl Iterator<Item = (&str, &TestRecord)> {
        self.records.iter().map(|(identity, record)| (identity.as_str(), record))
    }

    /// Sorted identities recorded with `outcome`
    pub fn tests_with(&self, outcome: Outcome) -> impl Iterator<Item = &str> {
        self.by_outcome
            .get(&outcome)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.by_outcome.get(&outcome).map_or(0, BTreeSet::len)
    }

    /// Non-zero outcome counts in canonical order
    pub fn outcome_counts(&self) -> Vec<(Outcome, usize)> {
        Outcome::ALL
            .iter()
            .map(|&o| (o, self.count(o)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// `path:line: OUTCOME: identity`, if the test is known
    pub fn locator(&self, identity: &str) -> Option<String> {
        self.records.get(identity).map(|record| {
            format!(
                "{}:{}: {}: {}",
                self.path.display(),
                record.line,
                record.outcome,
                identity
            )
        })
    }

    /// Report the test's locator line if known; returns the hit count (0 or 1).
    pub fn find<W: Write>(&self, identity: &str, tr: &mut TextReporter<W>) -> usize {
        match self.locator(identity) {
            Some(line) => {
                tr.writeln(&line);
                1
            }
            None => 0,
        }
    }
}
