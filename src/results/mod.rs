// DejaGnu result models: .sum/.log parsing, lazy companion logs, test runs
//
// A test run is the set of summary files found under a root. Each summary
// file is parsed eagerly; its companion detail log is only parsed when a
// lookup asks for detail.
//
// Layering (leaf first):
// - outcome: fixed vocabulary and result-line recognition
// - parser:  one file -> identity/outcome/line index
// - summary: summary file + lazily loaded companion log
// - run:     every summary file under a root, keyed by relative path

mod outcome;
mod parser;
mod run;
mod summary;

pub use outcome::Outcome;
pub use parser::{DejaFile, LogFile, TestRecord};
pub use run::TestRun;
pub use summary::{companion_path, Companion, OutcomeMismatch, SummaryFile};
pub(crate) use summary::{count_line, mismatch_line};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading result files
#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result type for result-file operations
pub type Result<T> = std::result::Result<T, ResultsError>;
