//! respack CLI — builds a resource package from its definition file.
//!
//! `respack path/to/game.package` discovers every resource declaration next
//! to the package file, converts what changed since the last run and writes
//! `data.package` into the configured output directory.

#![warn(missing_docs)]

mod build;

use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};

/// respack — an offline asset-build pipeline.
#[derive(Parser, Debug)]
#[command(name = "respack", version, about = "Resource package builder")]
pub struct Cli {
    /// Path to the package definition file.
    pub package: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Clear an existing output directory without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Number of worker threads for hashing and conversion.
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let Some(package) = cli.package.clone() else {
        eprintln!("error: must supply path to package definition file");
        eprintln!();
        // Printing help only fails if stdout is gone.
        let _ = Cli::command().print_help();
        process::exit(0);
    };

    init_logger(&cli);

    let result = configure_threads(cli.jobs).and_then(|()| build::run(&package, &cli));
    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    }
}

/// Installs `env_logger` at the level selected by `--quiet`/`--verbose`.
///
/// `RUST_LOG` overrides the flags.
fn init_logger(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(log_level(cli))
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn log_level(cli: &Cli) -> log::LevelFilter {
    if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

/// Sizes the global rayon pool when `--jobs` is given.
fn configure_threads(jobs: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_package_only() {
        let cli = Cli::parse_from(["respack", "assets/game.package"]);
        assert_eq!(cli.package, Some(PathBuf::from("assets/game.package")));
        assert!(!cli.quiet);
        assert!(!cli.verbose);
        assert!(!cli.yes);
        assert!(cli.jobs.is_none());
    }

    #[test]
    fn parse_without_package() {
        let cli = Cli::parse_from(["respack"]);
        assert!(cli.package.is_none());
    }

    #[test]
    fn parse_short_flags() {
        let cli = Cli::parse_from(["respack", "-y", "-v", "-j", "4", "game.package"]);
        assert!(cli.yes);
        assert!(cli.verbose);
        assert_eq!(cli.jobs, Some(4));
    }

    #[test]
    fn parse_long_flags() {
        let cli = Cli::parse_from(["respack", "--quiet", "--yes", "--jobs", "2", "game.package"]);
        assert!(cli.quiet);
        assert!(cli.yes);
        assert_eq!(cli.jobs, Some(2));
    }

    #[test]
    fn invalid_jobs_rejected() {
        assert!(Cli::try_parse_from(["respack", "--jobs", "many", "game.package"]).is_err());
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let cli = Cli::parse_from(["respack", "-q", "-v", "game.package"]);
        assert_eq!(log_level(&cli), log::LevelFilter::Error);
        let cli = Cli::parse_from(["respack", "-v", "game.package"]);
        assert_eq!(log_level(&cli), log::LevelFilter::Debug);
        let cli = Cli::parse_from(["respack", "game.package"]);
        assert_eq!(log_level(&cli), log::LevelFilter::Info);
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
