//! The end-to-end build.
//!
//! Stages run in a fixed order: load the package and its configuration,
//! discover and parse declarations, expand, validate names, prepare the
//! output directory, assign output names, hash, consult the cache, convert,
//! and write both manifests. Everything up to and including cache loading is
//! fatal on error. From hashing on, failures are tracked per object.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use respack_cache::{BuildCache, CacheDecision, SourceHasher};
use respack_config::{load_config, resolve_config, ResolvedConfig};

use crate::declaration::load_declarations;
use crate::discover::{discover_declarations, IgnoreSet};
use crate::dispatch::{convert_object, deliver};
use crate::error::{BuildError, Phase};
use crate::expand::expand_objects;
use crate::naming::assign_output_names;
use crate::object::{BuildObject, ObjectStatus};
use crate::output::{prepare_output_dir, OverwritePolicy};
use crate::package::{load_package, package_dir, write_package, PACKAGE_FILE};
use crate::registry::Registry;
use crate::validate::detect_naming_conflicts;

/// Caller-controlled build settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// What to do with a non-empty output directory when the configuration
    /// does not force overwriting.
    pub overwrite: OverwritePolicy,
}

/// One object that did not make it into the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFailure {
    /// The object's final name.
    pub name: String,
    /// The object's type.
    pub object_type: String,
    /// Why it failed.
    pub reason: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Objects reused from the intermediate cache.
    pub skipped: usize,
    /// Objects converted in this run.
    pub converted: usize,
    /// Objects that failed.
    pub failed: usize,
    /// Sum of the sizes of all packaged files.
    pub total_size: u64,
    /// Details for every failed object.
    pub failures: Vec<ObjectFailure>,
    /// Every final object with its outcome, in package order.
    pub objects: Vec<BuildObject>,
    /// The written `data.package`.
    pub package_file: PathBuf,
}

impl BuildReport {
    fn from_objects(objects: Vec<BuildObject>, total_size: u64, package_file: PathBuf) -> Self {
        let mut report = BuildReport {
            skipped: 0,
            converted: 0,
            failed: 0,
            total_size,
            failures: Vec::new(),
            objects: Vec::new(),
            package_file,
        };
        for object in &objects {
            match &object.status {
                ObjectStatus::Cached => report.skipped += 1,
                ObjectStatus::Converted => report.converted += 1,
                ObjectStatus::Failed(reason) => {
                    report.failed += 1;
                    report.failures.push(ObjectFailure {
                        name: object.name.clone(),
                        object_type: object.object_type.clone(),
                        reason: reason.clone(),
                    });
                }
                ObjectStatus::Pending => {}
            }
        }
        report.objects = objects;
        report
    }

    /// Looks up an object by final name.
    pub fn object(&self, name: &str) -> Option<&BuildObject> {
        self.objects.iter().find(|object| object.name == name)
    }
}

/// Builds the package defined by `package_file`.
///
/// Returns `Err` only for fatal errors; per-object failures are listed in
/// the report.
pub fn run(
    package_file: &Path,
    registry: &Registry,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    log::info!("processing {}", package_file.display());
    let package = load_package(package_file).map_err(|e| e.during(Phase::LoadingPackage))?;
    let package_dir = package_dir(package_file);

    let config = load_config(&package_dir)
        .map(|config| resolve_config(&config, &package_dir))
        .map_err(|e| BuildError::from(e).during(Phase::LoadingConfig))?;
    log_config(&config);

    let mut objects = locate_objects(&package_dir, &config, registry)
        .map_err(|e| e.during(Phase::LocatingResources))?;
    detect_naming_conflicts(&objects).map_err(|e| e.during(Phase::DetectingConflicts))?;

    prepare_output_dir(
        &config.output_dir,
        config.force_overwrite_output,
        options.overwrite,
    )
    .map_err(|e| e.during(Phase::PreparingOutput))?;
    assign_output_names(&mut objects, &config.output_dir, config.obfuscate);

    let mut cache = BuildCache::load_or_create(&config.intermediate_dir)
        .map_err(|e| BuildError::from(e).during(Phase::LoadingIntermediates))?;

    hash_objects(&mut objects);
    assign_intermediates(&mut objects, &mut cache);
    convert_objects(&mut objects, registry, !config.obfuscate);

    for object in objects.iter().filter(|object| object.is_packaged()) {
        if let Some(artifact) = &object.intermediate_file {
            cache.record(object.cache_key(), object.params.clone(), artifact);
        }
    }

    cache
        .save()
        .map_err(|e| BuildError::from(e).during(Phase::WritingManifests))?;
    let total_size = write_package(&package, &objects, &config.output_dir)
        .map_err(|e| e.during(Phase::WritingManifests))?;

    let report = BuildReport::from_objects(
        objects,
        total_size,
        config.output_dir.join(PACKAGE_FILE),
    );
    log::info!(
        "{} converted, {} reused, {} failed, {} bytes packaged",
        report.converted,
        report.skipped,
        report.failed,
        report.total_size
    );
    Ok(report)
}

fn log_config(config: &ResolvedConfig) {
    log::info!("output dir: {}", config.output_dir.display());
    log::info!("intermediate dir: {}", config.intermediate_dir.display());
    log::info!(
        "obfuscation {}",
        if config.obfuscate { "enabled" } else { "disabled" }
    );
}

/// Discovers, parses and expands every declaration below `package_dir`.
fn locate_objects(
    package_dir: &Path,
    config: &ResolvedConfig,
    registry: &Registry,
) -> Result<Vec<BuildObject>, BuildError> {
    let ignore = IgnoreSet::new(&config.ignore_dirs);
    let files = discover_declarations(package_dir, &ignore)?;
    log::info!("found {} resource declaration files", files.len());

    let declared: Vec<BuildObject> = files.iter().flat_map(|f| load_declarations(f)).collect();
    let mut objects = expand_objects(declared, registry);
    for object in &mut objects {
        if registry.is_work_in_progress(&object.object_type) {
            object.force_retranslate = true;
        }
    }
    log::info!("{} objects to build", objects.len());
    Ok(objects)
}

/// Computes source and parameter hashes in parallel.
///
/// Forced objects are rebuilt regardless and keep zero hashes. An
/// unreadable source fails the object.
fn hash_objects(objects: &mut [BuildObject]) {
    objects.par_iter_mut().for_each(|object| {
        if object.force_retranslate {
            return;
        }
        match SourceHasher::hash_file(&object.source_file) {
            Ok(hash) => {
                object.source_hash = hash;
                object.params_hash = SourceHasher::hash_params(&object.params);
            }
            Err(e) => fail(object, e),
        }
    });
}

/// Decides hit or miss for every live object, in order.
fn assign_intermediates(objects: &mut [BuildObject], cache: &mut BuildCache) {
    for object in objects.iter_mut().filter(|object| !object.is_failed()) {
        let key = object.cache_key();
        match cache.lookup(&key, &object.params, object.force_retranslate) {
            Ok(CacheDecision::Hit { path }) => {
                log::debug!("reusing {} for {}", path.display(), object.name);
                object.skip_conversion = true;
                object.intermediate_file = Some(path);
            }
            Ok(CacheDecision::Miss { path }) => {
                object.intermediate_file = Some(path);
            }
            Err(e) => fail(object, e),
        }
    }
}

/// Converts every miss and delivers every live object, in parallel.
fn convert_objects(objects: &mut [BuildObject], registry: &Registry, modify_filename: bool) {
    objects
        .par_iter_mut()
        .filter(|object| !object.is_failed())
        .for_each(|object| {
            let Some(artifact) = object.intermediate_file.clone() else {
                return;
            };
            let converted = if object.skip_conversion {
                Ok(())
            } else {
                convert_object(object, &artifact, registry, modify_filename)
            };
            match converted.and_then(|()| deliver(object, &artifact)) {
                Ok(size) => {
                    object.dest_size = size;
                    object.status = if object.skip_conversion {
                        ObjectStatus::Cached
                    } else {
                        ObjectStatus::Converted
                    };
                }
                Err(e) => fail(object, e),
            }
        });
}

fn fail(object: &mut BuildObject, reason: impl std::fmt::Display) {
    log::error!(
        "{} [{}] failed: {reason}",
        object.name,
        object.object_type
    );
    object.fail(reason.to_string());
}
