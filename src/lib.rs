//! dejadiff - DejaGnu test-result regression analysis
//!
//! Parses DejaGnu `.sum` summaries (and, on demand, their `.log` detail
//! files), groups them into test runs, and diffs two runs to report tests
//! that changed outcome, appeared or went away, plus summary files that
//! appeared or disappeared.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod json_output;
pub mod report;
pub mod results;
pub mod revision;
