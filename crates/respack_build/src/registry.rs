//! Converter and expander dispatch tables.
//!
//! A [`Registry`] is built once before a run and only read afterwards, so it
//! can be shared freely between conversion workers. Tests construct their
//! own registries with fake converters.

use std::collections::{HashMap, HashSet};

use respack_convert::{Converter, CopyConverter, JsonConverter, ShadercConverter};

use crate::expand::ShaderExpander;
use crate::object::BuildObject;

/// One object derived from a declaration by an [`Expander`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// The derived object. Its name is rewritten by the pipeline.
    pub object: BuildObject,
    /// The variant tag, appended to the base name as `<name>#<subtype>`.
    pub subtype: String,
}

/// Replaces one object with several variants.
///
/// Returning an empty list means no expansion is needed and the object is
/// kept as declared.
pub trait Expander: Send + Sync {
    /// Produces the variants of `object`.
    fn expand(&self, object: &BuildObject) -> Vec<Expansion>;
}

impl<F> Expander for F
where
    F: Fn(&BuildObject) -> Vec<Expansion> + Send + Sync,
{
    fn expand(&self, object: &BuildObject) -> Vec<Expansion> {
        self(object)
    }
}

/// Converters and expanders keyed by object type.
#[derive(Default)]
pub struct Registry {
    converters: HashMap<String, Box<dyn Converter>>,
    expanders: HashMap<String, Box<dyn Expander>>,
    work_in_progress: HashSet<String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in converters and expanders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ty in ["material", "model", "shader-program", "texture"] {
            registry.register_converter(ty, JsonConverter);
        }
        for ty in ["script", "string"] {
            registry.register_converter(ty, CopyConverter);
        }
        registry.register_converter("shader", ShadercConverter::default());
        registry.register_expander("shader", ShaderExpander);
        registry
    }

    /// Registers `converter` for `object_type`, replacing any previous one.
    pub fn register_converter(
        &mut self,
        object_type: impl Into<String>,
        converter: impl Converter + 'static,
    ) -> &mut Self {
        self.converters
            .insert(object_type.into(), Box::new(converter));
        self
    }

    /// Registers `expander` for `object_type`, replacing any previous one.
    pub fn register_expander(
        &mut self,
        object_type: impl Into<String>,
        expander: impl Expander + 'static,
    ) -> &mut Self {
        self.expanders.insert(object_type.into(), Box::new(expander));
        self
    }

    /// Marks `object_type` as work in progress: its objects skip the cache.
    pub fn mark_work_in_progress(&mut self, object_type: impl Into<String>) -> &mut Self {
        self.work_in_progress.insert(object_type.into());
        self
    }

    /// Looks up the converter for `object_type`.
    pub fn converter(&self, object_type: &str) -> Option<&dyn Converter> {
        self.converters.get(object_type).map(|c| c.as_ref())
    }

    /// Looks up the expander for `object_type`.
    pub fn expander(&self, object_type: &str) -> Option<&dyn Expander> {
        self.expanders.get(object_type).map(|e| e.as_ref())
    }

    /// Returns `true` if `object_type` is marked work in progress.
    pub fn is_work_in_progress(&self, object_type: &str) -> bool {
        self.work_in_progress.contains(object_type)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut converters: Vec<_> = self.converters.keys().collect();
        converters.sort();
        let mut expanders: Vec<_> = self.expanders.keys().collect();
        expanders.sort();
        f.debug_struct("Registry")
            .field("converters", &converters)
            .field("expanders", &expanders)
            .field("work_in_progress", &self.work_in_progress)
            .finish()
    }
}
