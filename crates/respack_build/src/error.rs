//! Error types for the build pipeline.
//!
//! [`BuildError`] covers the fatal category: anything that stops a run before
//! conversion begins. [`ObjectError`] covers failures of a single object,
//! which are recorded in the report and never abort the run.

use std::fmt;
use std::path::PathBuf;

use respack_cache::CacheError;
use respack_config::ConfigError;
use respack_convert::ConvertError;

/// The pipeline stage a fatal error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the package definition file.
    LoadingPackage,
    /// Reading `compile.config`.
    LoadingConfig,
    /// Walking the package directory for declarations.
    LocatingResources,
    /// Checking final object names for conflicts.
    DetectingConflicts,
    /// Clearing or creating the output directory.
    PreparingOutput,
    /// Loading the intermediate cache.
    LoadingIntermediates,
    /// Writing `intermediate.data` and `data.package`.
    WritingManifests,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::LoadingPackage => "loading package",
            Phase::LoadingConfig => "loading configuration",
            Phase::LocatingResources => "locating resources",
            Phase::DetectingConflicts => "detecting naming conflicts",
            Phase::PreparingOutput => "preparing output directory",
            Phase::LoadingIntermediates => "loading intermediate data",
            Phase::WritingManifests => "writing manifests",
        };
        f.write_str(text)
    }
}

/// One name claimed by more than one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    /// The contested object name.
    pub name: String,
    /// Every declaration file that produced an object with this name, in
    /// discovery order. A file appears twice if it declares the name twice.
    pub origins: Vec<PathBuf>,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The package definition file does not exist.
    #[error("package file {} does not exist", path.display())]
    PackageNotFound {
        /// The path given on the command line.
        path: PathBuf,
    },

    /// The package definition is not a JSON object.
    #[error("invalid package file {}: {reason}", path.display())]
    InvalidPackage {
        /// The package definition file.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// An I/O error on a path the pipeline owns.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// `compile.config` could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The intermediate cache could not be prepared or saved.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Two or more objects share a final name.
    #[error("{}", describe_conflicts(conflicts))]
    NamingConflict {
        /// Every contested name with its origins.
        conflicts: Vec<NameConflict>,
    },

    /// The output directory exists and clearing it was not allowed.
    #[error("output directory {} already exists and was not cleared", path.display())]
    OutputExists {
        /// The configured output directory.
        path: PathBuf,
    },

    /// Another error, tagged with the stage it happened in.
    #[error("error while {phase}: {source}")]
    Phase {
        /// The stage that failed.
        phase: Phase,
        /// The underlying failure.
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Wraps the error with the stage it occurred in.
    pub fn during(self, phase: Phase) -> Self {
        BuildError::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping phase tags.
    pub fn root(&self) -> &BuildError {
        match self {
            BuildError::Phase { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_conflicts(conflicts: &[NameConflict]) -> String {
    let mut text = String::new();
    for (i, conflict) in conflicts.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&format!(
            "naming conflict for resource \"{}\", declared in:",
            conflict.name
        ));
        for origin in &conflict.origins {
            text.push_str(&format!("\n\t{}", origin.display()));
        }
    }
    text
}

/// Errors that fail a single object.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The declared source file does not exist or cannot be read.
    #[error("cannot read source file {}: {source}", path.display())]
    Source {
        /// The resolved source file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// No converter is registered for the object's type.
    #[error("unknown type \"{0}\"")]
    UnknownType(String),

    /// The converter reported failure.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The converter returned success but left no usable artifact.
    #[error("converter left no output at {}", path.display())]
    EmptyArtifact {
        /// The intermediate file that should have been written.
        path: PathBuf,
    },

    /// The artifact could not be copied into the output directory.
    #[error("cannot copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        /// The intermediate artifact.
        from: PathBuf,
        /// The destination in the output directory.
        to: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
