// Summary (.sum) files and their lazily loaded companion (.log) files
//
// Detail logs are usually an order of magnitude larger than summaries and
// are only needed for `find`, so they are parsed on first use and then kept.

use crate::report::TextReporter;
use crate::results::{DejaFile, LogFile, Outcome, Result, TestRecord};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Load state of a summary's detail log
#[derive(Debug, Clone, Default)]
pub enum Companion {
    #[default]
    Unloaded,
    Loaded(LogFile),
}

impl Companion {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Companion::Loaded(_))
    }

    /// Parse the log at `path` on first call; later calls reuse it.
    ///
    /// A failed load leaves the state `Unloaded`.
    fn get_or_load(&mut self, path: &Path) -> Result<&LogFile> {
        match *self {
            Companion::Loaded(ref log) => Ok(log),
            Companion::Unloaded => {
                tracing::debug!("Loading companion log {}", path.display());
                *self = Companion::Loaded(LogFile::from_file(path)?);
                self.get_or_load(path)
            }
        }
    }
}

/// A test recorded with different outcomes in a summary and its log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMismatch {
    pub identity: String,
    pub summary: TestRecord,
    pub log: TestRecord,
}

/// A parsed summary file plus a handle on its detail log
#[derive(Debug, Clone)]
pub struct SummaryFile {
    file: DejaFile,
    log_path: PathBuf,
    companion: Companion,
}

impl SummaryFile {
    /// Parse the summary at `path`; its companion is `<base>.<log_extension>`.
    pub fn from_file<P: AsRef<Path>>(path: P, log_extension: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = DejaFile::from_file(path)?;
        Ok(Self::new(file, companion_path(path, log_extension)))
    }

    pub fn new(file: DejaFile, log_path: PathBuf) -> Self {
        Self {
            file,
            log_path,
            companion: Companion::Unloaded,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The summary's own parsed results
    pub fn results(&self) -> &DejaFile {
        &self.file
    }

    pub fn companion_loaded(&self) -> bool {
        self.companion.is_loaded()
    }

    /// Look the test up in the summary only.
    pub fn find<W: Write>(&self, identity: &str, tr: &mut TextReporter<W>) -> usize {
        self.file.find(identity, tr)
    }

    /// Look the test up in the summary and, on a hit, in the companion log.
    ///
    /// Returns up to 2 hits. An unreadable companion is logged and only the
    /// summary hit is counted. With `check_consistency`, a companion that
    /// records a different outcome gets a warning line in the report.
    pub fn find_with_companion<W: Write>(
        &mut self,
        identity: &str,
        tr: &mut TextReporter<W>,
        check_consistency: bool,
    ) -> usize {
        let count = self.file.find(identity, tr);
        if count == 0 {
            return 0;
        }

        let log = match self.companion.get_or_load(&self.log_path) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Skipping detail lookup for {}: {}", self.file.path().display(), e);
                return count;
            }
        };

        let hits = log.find(identity, tr);
        if check_consistency {
            if let (Some(summary), Some(detail)) = (self.file.get(identity), log.get(identity)) {
                if summary.outcome != detail.outcome {
                    tracing::warn!(
                        "{} and {} disagree on {}",
                        self.file.path().display(),
                        log.path().display(),
                        identity
                    );
                    tr.writeln(&mismatch_line(
                        log.path(),
                        self.file.path(),
                        &OutcomeMismatch {
                            identity: identity.to_string(),
                            summary: *summary,
                            log: *detail,
                        },
                    ));
                }
            }
        }
        count + hits
    }

    /// Every test whose outcome differs between the summary and its log.
    ///
    /// Tests missing from either side are not mismatches.
    pub fn mismatches(&mut self) -> Result<Vec<OutcomeMismatch>> {
        let log = self.companion.get_or_load(&self.log_path)?;
        let found = self
            .file
            .identities()
            .filter_map(|identity| {
                let summary = self.file.get(identity)?;
                let detail = log.get(identity)?;
                (summary.outcome != detail.outcome).then(|| OutcomeMismatch {
                    identity: identity.to_string(),
                    summary: *summary,
                    log: *detail,
                })
            })
            .collect();
        Ok(found)
    }

    /// Section with one `"<OUTCOME>: <n> tests"` line per non-empty outcome.
    pub fn summarize<W: Write>(&self, tr: &mut TextReporter<W>) {
        let mut section = tr.section(self.path().display().to_string());
        for (outcome, n) in self.file.outcome_counts() {
            section.writeln(&count_line(outcome, n));
        }
    }

    /// Section per outcome (empty ones included) listing every test.
    pub fn dump<W: Write>(&self, tr: &mut TextReporter<W>) {
        let mut section = tr.section(self.path().display().to_string());
        for outcome in Outcome::ALL {
            let mut group = section.section(count_line(outcome, self.file.count(outcome)));
            for identity in self.file.tests_with(outcome) {
                group.writeln(identity);
            }
        }
    }
}

/// `<dir>/<base>.<log_extension>` for a summary at `<dir>/<base>.<ext>`
pub fn companion_path(summary: &Path, log_extension: &str) -> PathBuf {
    summary.with_extension(log_extension)
}

pub(crate) fn count_line(outcome: Outcome, n: usize) -> String {
    format!("{}: {} tests", outcome, n)
}

pub(crate) fn mismatch_line(log_path: &Path, summary_path: &Path, m: &OutcomeMismatch) -> String {
    format!(
        "{}:{}: warning: {} but {} has {}: {}",
        log_path.display(),
        m.log.line,
        m.log.outcome,
        summary_path.display(),
        m.summary.outcome,
        m.identity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn output(tr: TextReporter<Vec<u8>>) -> String {
        String::from_utf8(tr.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_companion_path_swaps_extension() {
        assert_eq!(
            companion_path(Path::new("/a/b/gcc.sum"), "log"),
            PathBuf::from("/a/b/gcc.log")
        );
    }

    #[test]
    fn test_find_with_companion_reports_both_hits() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\nFAIL: t2\n");
        write(&dir, "gcc.log", "spawn gcc\nPASS: t1\nnoise\nFAIL: t2\n");

        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        assert!(!sf.companion_loaded());

        let mut tr = TextReporter::new(Vec::new());
        assert_eq!(sf.find_with_companion("t2", &mut tr, true), 2);
        assert!(sf.companion_loaded());

        let out = output(tr);
        assert!(out.contains("gcc.sum:2: FAIL: t2"));
        assert!(out.contains("gcc.log:4: FAIL: t2"));
    }

    #[test]
    fn test_miss_does_not_load_companion() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\n");
        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        assert_eq!(sf.find_with_companion("absent", &mut tr, true), 0);
        assert!(!sf.companion_loaded());
    }

    #[test]
    fn test_companion_loaded_once() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\n");
        let log = write(&dir, "gcc.log", "PASS: t1\n");

        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        assert_eq!(sf.find_with_companion("t1", &mut tr, true), 2);

        // Rewriting the log after the first load must not be observed.
        fs::write(&log, "FAIL: other\n").unwrap();
        assert_eq!(sf.find_with_companion("t1", &mut tr, true), 2);
    }

    #[test]
    fn test_missing_companion_degrades_to_summary_hit() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\n");
        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        assert_eq!(sf.find_with_companion("t1", &mut tr, true), 1);
        assert!(!sf.companion_loaded());
    }

    #[test]
    fn test_disagreement_is_reported_as_warning() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\n");
        write(&dir, "gcc.log", "x\nFAIL: t1\n");

        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        assert_eq!(sf.find_with_companion("t1", &mut tr, true), 2);
        let out = output(tr);
        assert!(out.contains("gcc.log:2: warning: FAIL but "));
        assert!(out.contains("gcc.sum has PASS: t1"));

        let mismatches = sf.mismatches().unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].identity, "t1");
        assert_eq!(mismatches[0].summary.outcome, Outcome::Pass);
        assert_eq!(mismatches[0].log.outcome, Outcome::Fail);
    }

    #[test]
    fn test_disagreement_silent_without_check() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "gcc.sum", "PASS: t1\n");
        write(&dir, "gcc.log", "FAIL: t1\n");

        let mut sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        sf.find_with_companion("t1", &mut tr, false);
        assert!(!output(tr).contains("warning"));
    }

    #[test]
    fn test_summarize_lists_nonempty_outcomes_in_order() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "g.sum", "UNSUPPORTED: u\nPASS: a\nPASS: b\nFAIL: c\n");
        let sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        sf.summarize(&mut tr);
        let out = output(tr);
        let title = sum.display().to_string();
        let expected = format!(
            "{}\n{}\n\n FAIL: 1 tests\n PASS: 2 tests\n UNSUPPORTED: 1 tests\n\n",
            title,
            "-".repeat(title.chars().count())
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_dump_includes_empty_outcomes() {
        let dir = TempDir::new().unwrap();
        let sum = write(&dir, "g.sum", "PASS: b\nPASS: a\n");
        let sf = SummaryFile::from_file(&sum, "log").unwrap();
        let mut tr = TextReporter::new(Vec::new());
        sf.dump(&mut tr);
        let out = output(tr);
        assert!(out.contains(" PASS: 2 tests\n"));
        assert!(out.contains("  a\n  b\n"));
        assert!(out.contains(" KPASS: 0 tests\n"));
    }
}
