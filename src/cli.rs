//! CLI argument parsing for dejadiff

use crate::config::{Config, ConfigError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented human-readable report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "dejadiff")]
#[command(version)]
#[command(about = "Compare DejaGnu test results between two runs", long_about = None)]
pub struct Cli {
    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read settings from a TOML file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Summary file extension (default: sum)
    #[arg(long = "sum-ext", global = true, value_name = "EXT")]
    pub sum_ext: Option<String>,

    /// Detail log extension (default: log)
    #[arg(long = "log-ext", global = true, value_name = "EXT")]
    pub log_ext: Option<String>,

    /// Do not warn when a summary and its log disagree on an outcome
    #[arg(long = "no-consistency-check", global = true)]
    pub no_consistency_check: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare a "before" run to an "after" run; exit code is the issue count.
    ///
    /// Accepts two summary files or two directories. Directories are paired
    /// file by file on their relative layout.
    Compare {
        before: PathBuf,
        after: PathBuf,

        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print every test of each summary file, grouped by outcome
    Dump {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Locate a test by name in summary files and their logs; exit code is the match count
    Find {
        testname: String,

        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Skip the detail log lookup
        #[arg(long = "summary-only")]
        summary_only: bool,
    },

    /// Print per-outcome test counts for each summary file
    Summarize {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List tests whose outcome differs between a summary and its log; exit code is the count
    Verify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Find the archived baseline revision for COMMIT, optionally comparing against it
    Baseline {
        /// Archive root laid out as <data-dir>/<builder>/<lang>/<branch>/r<N>.sum[.xz]
        #[arg(long = "data-dir", value_name = "PATH")]
        data_dir: PathBuf,

        #[arg(long)]
        builder: String,

        #[arg(long)]
        lang: String,

        #[arg(long)]
        branch: String,

        /// Revision under test
        commit: u64,

        /// Compare baseline and target summaries, decompressing .xz archives
        #[arg(long)]
        compare: bool,

        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl Cli {
    /// Config file (if any) with CLI overrides applied, validated.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(ext) = &self.sum_ext {
            config.summary_extension = ext.clone();
        }
        if let Some(ext) = &self.log_ext {
            config.log_extension = ext.clone();
        }
        if self.no_consistency_check {
            config.check_consistency = false;
        }
        config.validate()?;
        Ok(config)
    }
}
