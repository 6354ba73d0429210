//! Resolution of configured paths against the package directory.

use crate::types::CompileConfig;
use std::path::{Path, PathBuf};

/// A configuration with every directory resolved against the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Directory receiving the finished package.
    pub output_dir: PathBuf,
    /// Directory holding cached artifacts and `intermediate.data`.
    pub intermediate_dir: PathBuf,
    /// Whether output files are named by sequence number.
    pub obfuscate: bool,
    /// Directories skipped during declaration discovery.
    pub ignore_dirs: Vec<PathBuf>,
    /// Whether an existing output directory may be cleared without asking.
    pub force_overwrite_output: bool,
}

/// Resolves all relative paths in `config` against `package_dir`.
///
/// Absolute paths in the configuration are kept as-is. The output and
/// intermediate directories are implicitly ignored during discovery so that
/// previously built artifacts are never picked up as declarations.
pub fn resolve_config(config: &CompileConfig, package_dir: &Path) -> ResolvedConfig {
    let output_dir = package_dir.join(&config.output);
    let intermediate_dir = package_dir.join(&config.intermediate);

    let mut ignore_dirs: Vec<PathBuf> = config
        .ignore
        .iter()
        .map(|dir| package_dir.join(dir))
        .collect();
    for implicit in [&output_dir, &intermediate_dir] {
        if !ignore_dirs.contains(implicit) {
            ignore_dirs.push(implicit.clone());
        }
    }

    ResolvedConfig {
        output_dir,
        intermediate_dir,
        obfuscate: config.obfuscate,
        ignore_dirs,
        force_overwrite_output: config.force_overwrite_output,
    }
}
