//! Baseline selection for archived per-revision results
//!
//! CI keeps one summary per tested revision under
//! `<data-dir>/<builder>/<lang>/<branch>/r<N>.<ext>[.xz]`. The baseline for
//! revision `N` is the newest archived revision strictly older than `N`.

use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;
use xz2::read::XzDecoder;

#[derive(Error, Debug)]
pub enum RevisionError {
    #[error("Failed to list archive directory {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid archive name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("No archived summary for r{revision} in {dir}")]
    Missing { revision: u64, dir: PathBuf },

    #[error("Failed to decompress {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Location of one builder/language/branch archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub data_dir: PathBuf,
    pub builder: String,
    pub lang: String,
    pub branch: String,
}

impl ArchiveLayout {
    pub fn directory(&self) -> PathBuf {
        self.data_dir
            .join(&self.builder)
            .join(&self.lang)
            .join(&self.branch)
    }

    /// Decompressed summary for `revision`: `r<revision>.<extension>`
    pub fn summary_path(&self, revision: u64, extension: &str) -> PathBuf {
        self.directory()
            .join(format!("r{}.{}", revision, extension))
    }

    /// Compressed summary for `revision`: `r<revision>.<extension>.xz`
    pub fn archive_path(&self, revision: u64, extension: &str) -> PathBuf {
        self.directory()
            .join(format!("r{}.{}.xz", revision, extension))
    }

    /// The file holding `revision`: the plain summary when present,
    /// otherwise its `.xz` archive.
    pub fn stored_path(&self, revision: u64, extension: &str) -> PathBuf {
        let plain = self.summary_path(revision, extension);
        if plain.is_file() {
            plain
        } else {
            self.archive_path(revision, extension)
        }
    }

    /// Make `revision`'s summary readable as a plain file.
    ///
    /// A plain `r<N>.<ext>` is used as is. Otherwise `r<N>.<ext>.xz` is
    /// decompressed into a temporary `.<ext>` file that lives as long as the
    /// returned value.
    pub fn open_summary(
        &self,
        revision: u64,
        extension: &str,
    ) -> Result<RevisionSummary, RevisionError> {
        let plain = self.summary_path(revision, extension);
        if plain.is_file() {
            return Ok(RevisionSummary {
                path: plain,
                _decompressed: None,
            });
        }

        let archive = self.archive_path(revision, extension);
        if !archive.is_file() {
            return Err(RevisionError::Missing {
                revision,
                dir: self.directory(),
            });
        }
        let temp = decompress(&archive, revision, extension)?;
        Ok(RevisionSummary {
            path: temp.to_path_buf(),
            _decompressed: Some(temp),
        })
    }
}

/// A revision's summary on disk, removed on drop if it was decompressed
#[derive(Debug)]
pub struct RevisionSummary {
    path: PathBuf,
    _decompressed: Option<TempPath>,
}

impl RevisionSummary {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decompress(archive: &Path, revision: u64, extension: &str) -> Result<TempPath, RevisionError> {
    let failed = |source: io::Error| RevisionError::Decompress {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(failed)?;
    let mut decoder = XzDecoder::new(BufReader::new(file));
    let mut out = tempfile::Builder::new()
        .prefix(&format!("r{}.", revision))
        .suffix(&format!(".{}", extension))
        .tempfile()
        .map_err(failed)?;
    let bytes = io::copy(&mut decoder, &mut out).map_err(failed)?;

    tracing::debug!(
        "Decompressed {} ({} bytes) to {}",
        archive.display(),
        bytes,
        out.path().display()
    );
    Ok(out.into_temp_path())
}

/// Matches `r<N>.<ext>` and `r<N>.<ext>.xz`
fn archive_pattern(extension: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^r(\d+)\.{}(?:\.xz)?$", regex::escape(extension)))
}

fn revision_from(pattern: &Regex, file_name: &str) -> Option<u64> {
    pattern
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Greatest archived revision strictly less than `commit`, if any.
pub fn find_previous_revision(
    dir: &Path,
    extension: &str,
    commit: u64,
) -> Result<Option<u64>, RevisionError> {
    let pattern = archive_pattern(extension)?;
    let entries = fs::read_dir(dir).map_err(|source| RevisionError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut previous = None;
    for entry in entries {
        let entry = entry.map_err(|source| RevisionError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(rev) = name.to_str().and_then(|n| revision_from(&pattern, n)) else {
            continue;
        };
        if rev < commit && previous.map_or(true, |p| rev > p) {
            previous = Some(rev);
        }
    }

    match previous {
        Some(rev) => tracing::info!("Baseline for r{} in {} is r{}", commit, dir.display(), rev),
        None => tracing::info!("No baseline for r{} in {}", commit, dir.display()),
    }
    Ok(previous)
}
