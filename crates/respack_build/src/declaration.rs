//! Resource declaration parsing.
//!
//! A declaration file holds one JSON object or an array of them:
//!
//! ```json
//! { "name": "hero", "type": "image", "file": "hero.png",
//!   "parameters": { "srgb": true }, "always-retranslate": false }
//! ```
//!
//! `file` is relative to the declaration file. `params` is accepted as an
//! alias for `parameters`. Entries that cannot be parsed are logged and
//! skipped; they never abort discovery. The same goes for names that cannot
//! be used as a file name inside the output directory.

use std::path::{Component, Path};

use serde::Deserialize;
use serde_json::Value;

use crate::object::BuildObject;
use crate::package::PACKAGE_FILE;

/// One entry of a declaration file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Declaration {
    name: String,
    #[serde(rename = "type")]
    object_type: String,
    file: String,
    #[serde(default = "empty_params", alias = "params")]
    parameters: Value,
    #[serde(default)]
    always_retranslate: bool,
}

fn empty_params() -> Value {
    Value::Object(Default::default())
}

/// Parses the contents of the declaration file at `origin`.
///
/// Returns every valid entry as a [`BuildObject`], in file order. A document
/// that is not valid JSON yields no objects.
pub fn parse_declarations(content: &str, origin: &Path) -> Vec<BuildObject> {
    let document: Value = match serde_json::from_str(content) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("skipping {}: {e}", origin.display());
            return Vec::new();
        }
    };

    let entries = match document {
        Value::Array(entries) => entries,
        single @ Value::Object(_) => vec![single],
        other => {
            log::warn!(
                "resource declared in {} is not valid (value = {other})",
                origin.display()
            );
            return Vec::new();
        }
    };

    let base = origin.parent().unwrap_or_else(|| Path::new(""));
    entries
        .into_iter()
        .filter_map(|entry| match Declaration::deserialize(&entry) {
            Ok(decl) if !is_valid_name(&decl.name) => {
                log::warn!(
                    "resource declared in {} has an invalid name \"{}\"",
                    origin.display(),
                    decl.name
                );
                None
            }
            Ok(decl) => Some(into_object(decl, base, origin)),
            Err(e) => {
                log::warn!(
                    "resource declared in {} is not valid: {e} (value = {entry})",
                    origin.display()
                );
                None
            }
        })
        .collect()
}

/// Reads and parses the declaration file at `path`.
///
/// An unreadable file is logged and yields no objects.
pub fn load_declarations(path: &Path) -> Vec<BuildObject> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_declarations(&content, path),
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// A name must be a single plain path component and must not collide with
/// the package manifest.
pub fn is_valid_name(name: &str) -> bool {
    if name == PACKAGE_FILE || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn into_object(decl: Declaration, base: &Path, origin: &Path) -> BuildObject {
    log::debug!(
        "resource: name = {}, type = {}, file = {}",
        decl.name,
        decl.object_type,
        decl.file
    );
    let mut object = BuildObject::new(
        decl.name,
        decl.object_type,
        base.join(&decl.file),
        decl.parameters,
        origin,
    );
    object.force_retranslate = decl.always_retranslate;
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn single_object() {
        let objects = parse_declarations(
            r#"{ "name": "hero", "type": "image", "file": "hero.png" }"#,
            Path::new("art/chars/hero.resource"),
        );
        assert_eq!(objects.len(), 1);
        let hero = &objects[0];
        assert_eq!(hero.name, "hero");
        assert_eq!(hero.object_type, "image");
        assert_eq!(hero.source_file, PathBuf::from("art/chars/hero.png"));
        assert_eq!(hero.params, json!({}));
        assert_eq!(hero.declaration_origin, PathBuf::from("art/chars/hero.resource"));
        assert!(!hero.force_retranslate);
    }

    #[test]
    fn array_with_params_and_flags() {
        let objects = parse_declarations(
            r#"[
                { "name": "a", "type": "string", "file": "a.txt", "parameters": { "lang": "en" } },
                { "name": "b", "type": "string", "file": "sub/b.txt", "params": [1, 2],
                  "always-retranslate": true }
            ]"#,
            Path::new("text.resources"),
        );
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].params, json!({"lang": "en"}));
        assert_eq!(objects[1].params, json!([1, 2]));
        assert_eq!(objects[1].source_file, PathBuf::from("sub/b.txt"));
        assert!(objects[1].force_retranslate);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let objects = parse_declarations(
            r#"[
                { "name": "ok", "type": "string", "file": "ok.txt" },
                { "name": "no-file", "type": "string" },
                42,
                { "name": "also-ok", "type": "script", "file": "b.lua" }
            ]"#,
            Path::new("mixed.resources"),
        );
        let names: Vec<_> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["ok", "also-ok"]);
    }

    #[test]
    fn names_must_stay_inside_the_output_dir() {
        let objects = parse_declarations(
            r#"[
                { "name": "../escaped", "type": "string", "file": "a.txt" },
                { "name": "sub/dir", "type": "string", "file": "a.txt" },
                { "name": "..", "type": "string", "file": "a.txt" },
                { "name": "", "type": "string", "file": "a.txt" },
                { "name": "data.package", "type": "string", "file": "a.txt" },
                { "name": "water#linux", "type": "string", "file": "a.txt" }
            ]"#,
            Path::new("names.resources"),
        );
        let names: Vec<_> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["water#linux"]);
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("hero"));
        assert!(is_valid_name("hero.png"));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name("a\\b"));
        assert!(!is_valid_name("/abs"));
        assert!(!is_valid_name(PACKAGE_FILE));
    }

    #[test]
    fn invalid_documents_yield_nothing() {
        assert!(parse_declarations("{ not json", Path::new("x.resource")).is_empty());
        assert!(parse_declarations("\"just a string\"", Path::new("x.resource")).is_empty());
    }

    #[test]
    fn unreadable_file_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_declarations(&dir.path().join("missing.resource")).is_empty());
    }
}
