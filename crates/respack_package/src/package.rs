//! The package manifest reader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PackageError;

/// File name of the package manifest inside an output directory.
pub const PACKAGE_FILE: &str = "data.package";

/// A `resources` entry as written by the build.
#[derive(Debug, Deserialize)]
struct ResourceEntry {
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    file: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    resources: Vec<ResourceEntry>,
}

/// One packaged resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The resource's name as declared.
    pub name: String,
    /// The resource's type.
    pub resource_type: String,
    /// Absolute location of the packaged file.
    pub path: PathBuf,
    /// Size recorded at build time.
    pub size: u64,
}

/// An opened package: every resource in it, keyed by name.
#[derive(Debug, Clone)]
pub struct Package {
    root: PathBuf,
    resources: BTreeMap<String, Resource>,
}

impl Package {
    /// Opens a package from its output directory or its `data.package` file.
    pub fn open(path: &Path) -> Result<Self, PackageError> {
        let manifest_path = if path.is_dir() {
            path.join(PACKAGE_FILE)
        } else {
            path.to_path_buf()
        };
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let content = std::fs::read_to_string(&manifest_path).map_err(|e| PackageError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| PackageError::Manifest {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;

        let mut resources = BTreeMap::new();
        for entry in manifest.resources {
            let resource = Resource {
                path: root.join(&entry.file),
                name: entry.name,
                resource_type: entry.resource_type,
                size: entry.size,
            };
            if let Some(previous) = resources.insert(resource.name.clone(), resource) {
                log::warn!("duplicate resource \"{}\" in {}", previous.name, manifest_path.display());
            }
        }
        log::debug!("mapped {} resources from {}", resources.len(), manifest_path.display());

        Ok(Self { root, resources })
    }

    /// The directory holding the packaged files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks up a resource by name.
    pub fn find(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Iterates over all resources in name order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Iterates over all resources of one type, in name order.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.resources().filter(move |r| r.resource_type == resource_type)
    }

    /// Number of resources in the package.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the package holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Reads the bytes of the named resource.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, PackageError> {
        let resource = self
            .find(name)
            .ok_or_else(|| PackageError::NotFound(name.to_string()))?;
        std::fs::read(&resource.path).map_err(|e| PackageError::Io {
            path: resource.path.clone(),
            source: e,
        })
    }
}
