use anyhow::Result;
use clap::Parser;
use dejadiff::cli::{Cli, Command};
use dejadiff::commands;
use dejadiff::revision::ArchiveLayout;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG (default warn)
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Counts become the exit status, saturating so a large count never reads as success
fn exit_code(count: usize) -> ExitCode {
    ExitCode::from(u8::try_from(count).unwrap_or(u8::MAX))
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = args.resolve_config()?;
    let stdout = io::stdout().lock();

    let count = match args.command {
        Command::Compare {
            before,
            after,
            format,
        } => commands::compare(&before, &after, &config, format, stdout)?,
        Command::Dump { paths } => {
            commands::dump(&paths, &config, stdout)?;
            0
        }
        Command::Find {
            testname,
            paths,
            summary_only,
        } => commands::find(&testname, &paths, &config, !summary_only, stdout)?,
        Command::Summarize { paths, format } => {
            commands::summarize(&paths, &config, format, stdout)?;
            0
        }
        Command::Verify { paths } => commands::verify(&paths, &config, stdout)?,
        Command::Baseline {
            data_dir,
            builder,
            lang,
            branch,
            commit,
            compare,
            format,
        } => {
            let layout = ArchiveLayout {
                data_dir,
                builder,
                lang,
                branch,
            };
            commands::baseline(&layout, commit, compare, &config, format, stdout)?
        }
    };

    Ok(exit_code(count))
}
