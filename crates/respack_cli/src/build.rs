//! The build command: runs the pipeline and reports the outcome.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use respack_build::{BuildOptions, OverwritePolicy, Registry};

use crate::Cli;

/// Exit code when the package was built but some objects failed.
pub const EXIT_OBJECTS_FAILED: i32 = 2;

/// Builds the package at `package_file`.
///
/// Returns exit code 0 when every object was packaged and
/// [`EXIT_OBJECTS_FAILED`] when some failed. Fatal errors are returned as `Err`.
pub fn run(package_file: &Path, cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let options = BuildOptions {
        overwrite: overwrite_policy(cli.yes, std::io::stdin().is_terminal()),
    };
    let registry = Registry::with_defaults();

    let report = respack_build::run(package_file, &registry, &options)?;

    if !cli.quiet {
        eprintln!("{} file(s) translated", report.converted);
        eprintln!("{} file(s) reused", report.skipped);
        eprintln!("{} file(s) failed", report.failed);
        eprintln!("wrote {}", report.package_file.display());
    }
    for failure in &report.failures {
        eprintln!(
            "error: {} [{}]: {}",
            failure.name, failure.object_type, failure.reason
        );
    }

    Ok(if report.failed > 0 {
        EXIT_OBJECTS_FAILED
    } else {
        0
    })
}

/// Chooses how a non-empty output directory is handled.
fn overwrite_policy(yes: bool, interactive: bool) -> OverwritePolicy {
    if yes {
        OverwritePolicy::Allow
    } else if interactive {
        OverwritePolicy::Ask(confirm_overwrite)
    } else {
        OverwritePolicy::Deny
    }
}

/// Asks on the terminal whether `dir` may be cleared.
fn confirm_overwrite(dir: &Path) -> bool {
    eprintln!("warning: output directory {} already exists", dir.display());
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("overwrite? (y/n) ");
        let _ = std::io::stderr().flush();
        match lines.next() {
            Some(Ok(line)) => match parse_answer(&line) {
                Some(answer) => return answer,
                None => continue,
            },
            _ => return false,
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim_start().chars().next() {
        Some('y') | Some('Y') => Some(true),
        Some('n') | Some('N') => Some(false),
        _ => None,
    }
}
