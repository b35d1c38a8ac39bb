// Shared fixtures for CLI integration tests
//
// Builds throwaway DejaGnu result trees on disk.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xz2::write::XzEncoder;

/// A temporary directory holding one or more result trees
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `text` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    /// Write `text` xz-compressed to `rel`, as the CI archiver does.
    pub fn write_xz(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut encoder = XzEncoder::new(fs::File::create(&path).unwrap(), 6);
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Header and trailer noise as emitted by runtest around result lines
pub fn sum_text(results: &[&str]) -> String {
    let mut text = String::from(
        "Test Run By builder on Sat Mar  1 12:00:00 2014\n\
         Native configuration is x86_64-pc-linux-gnu\n\n\
         \t\t=== gcc tests ===\n\n\
         Schedule of variations:\n    unix\n\n\
         Running target unix\n",
    );
    for line in results {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("\n\t\t=== gcc Summary ===\n\n# of expected passes\t\t1\n");
    text
}
