//! Hierarchical plain-text report writer
//!
//! Sections are opened with [`TextReporter::section`] and closed when the
//! returned [`Section`] guard is dropped, so every title/underline pair gets
//! its trailing blank line and indentation is restored on every exit path.
//!
//! ```
//! use dejadiff::report::TextReporter;
//!
//! let mut tr = TextReporter::new(Vec::new());
//! {
//!     let mut section = tr.section("Results");
//!     section.writeln("PASS: 3 tests");
//! }
//! let out = String::from_utf8(tr.finish().unwrap()).unwrap();
//! assert_eq!(out, "Results\n-------\n\n PASS: 3 tests\n\n");
//! ```

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

/// Indenting text writer
///
/// Write failures are sticky: the first error is kept and reported by
/// [`TextReporter::finish`], later writes become no-ops.
pub struct TextReporter<W: Write> {
    out: W,
    indent: usize,
    error: Option<io::Error>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 0,
            error: None,
        }
    }

    /// Write one line at the current indentation.
    ///
    /// An empty string produces a bare newline with no indentation.
    pub fn writeln(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let result = if text.is_empty() {
            writeln!(self.out)
        } else {
            writeln!(self.out, "{:indent$}{}", "", text, indent = self.indent)
        };
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    /// Open a section: title, dash underline, blank line, then indent.
    pub fn section(&mut self, title: impl AsRef<str>) -> Section<'_, W> {
        let title = title.as_ref();
        self.writeln(title);
        self.writeln(&"-".repeat(title.chars().count()));
        self.writeln("");
        self.indent += 1;
        Section { reporter: self }
    }

    /// Flush and hand back the underlying writer, surfacing any write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Open section; closes itself on drop
pub struct Section<'a, W: Write> {
    reporter: &'a mut TextReporter<W>,
}

impl<W: Write> Deref for Section<'_, W> {
    type Target = TextReporter<W>;

    fn deref(&self) -> &Self::Target {
        self.reporter
    }
}

impl<W: Write> DerefMut for Section<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reporter
    }
}

impl<W: Write> Drop for Section<'_, W> {
    fn drop(&mut self) {
        self.reporter.writeln("");
        self.reporter.indent -= 1;
    }
}
