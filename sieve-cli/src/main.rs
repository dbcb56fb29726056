//! `sieve` command-line front end.
//!
//! Loads the configuration and rule files, then scores the input file (or
//! every file in the input directory) into the destination directory.
//!
//! ```bash
//! sieve records.txt --config config.toml --suffix suffix.txt --domains domains.txt
//! sieve ./dumps --destination ./scored --log debug --log-file sieve.log
//! ```
//!
//! Each failure category exits with its own status; see
//! [`ConfigError::exit_code`] and [`PipelineError::exit_code`].

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use logging::LogError;
use sieve_core::config::{ConfigError, ConfigLoader, DEFAULT_CONFIG_FILE};
use sieve_core::pipeline::{analyse_path, PipelineError, RunSettings};

/// Scores lines of delimited text files by keyword proximity.
#[derive(Debug, Parser)]
#[command(name = "sieve", version, about)]
struct Cli {
    /// Input file, or directory whose files are each processed
    input: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Suffix rule file, used when the configuration names none
    #[arg(short, long)]
    suffix: Option<PathBuf>,

    /// Domain rule file, used when the configuration names none
    #[arg(short, long)]
    domains: Option<PathBuf>,

    /// Output directory, created if missing
    #[arg(long, default_value = ".")]
    destination: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Logging(#[from] LogError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(e) => e.exit_code(),
            CliError::Pipeline(e) => e.exit_code(),
            CliError::Logging(_) => 14,
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    debug!(args = ?cli, "arguments parsed");

    let loaded = ConfigLoader::from_file(&cli.config)?
        .suffix_file(cli.suffix)
        .domains_file(cli.domains)
        .load()?;

    let settings = RunSettings {
        destination: cli.destination,
        extension: loaded.extension,
        encoding: loaded.encoding,
    };
    debug!(
        destination = %settings.destination.display(),
        extension = %settings.extension,
        encoding = settings.encoding.name(),
        "run settings"
    );

    let reports = analyse_path(&cli.input, &loaded.scoring, &settings)?;

    let saved: u64 = reports.iter().map(|r| r.stats.lines_retained).sum();
    let skipped: u64 = reports.iter().map(|r| r.stats.lines_skipped).sum();
    info!(files = reports.len(), rows_saved = saved, rows_skipped = skipped, "run finished");

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(logging::level_from_name(&cli.log), cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            let e = CliError::from(e);
            eprintln!("sieve: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "aborted");
            eprintln!("sieve: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["sieve", "input.txt"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.destination, PathBuf::from("."));
        assert_eq!(cli.log, "info");
        assert!(cli.suffix.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "sieve",
            "dir",
            "--config",
            "c.toml",
            "--suffix",
            "s.txt",
            "--domains",
            "d.txt",
            "--destination",
            "out",
            "-l",
            "debug",
            "--log-file",
            "run.log",
        ])
        .unwrap();
        assert_eq!(cli.suffix, Some(PathBuf::from("s.txt")));
        assert_eq!(cli.domains, Some(PathBuf::from("d.txt")));
        assert_eq!(cli.log, "debug");
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["sieve"]).is_err());
    }
}
