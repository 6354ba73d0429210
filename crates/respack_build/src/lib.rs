//! Build orchestration for the asset pipeline.
//!
//! A build reads a package definition, discovers every resource declaration
//! below it, expands declarations into build objects, validates their names,
//! consults the intermediate cache, converts whatever changed and finally
//! writes the package manifest. [`run`] drives the whole sequence; the
//! individual stages are public so tools can reuse them.

#![warn(missing_docs)]

pub mod declaration;
pub mod discover;
pub mod dispatch;
pub mod error;
pub mod expand;
pub mod naming;
pub mod object;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod registry;
pub mod validate;

pub use error::{BuildError, NameConflict, ObjectError, Phase};
pub use expand::ShaderExpander;
pub use object::{BuildObject, ObjectStatus};
pub use output::OverwritePolicy;
pub use pipeline::{run, BuildOptions, BuildReport, ObjectFailure};
pub use registry::{Expander, Expansion, Registry};
