#![no_main]

use dejadiff::diff::compare_files;
use dejadiff::results::DejaFile;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes, including invalid UTF-8, must parse without panicking
    let Ok(file) = DejaFile::from_reader("fuzz.sum", Cursor::new(data.to_vec())) else {
        return;
    };

    // Every indexed identity resolves back to its outcome
    for (identity, record) in file.records() {
        assert!(file.tests_with(record.outcome).any(|i| i == identity));
    }
    assert!(compare_files(".", &file, &file).is_empty());
});
