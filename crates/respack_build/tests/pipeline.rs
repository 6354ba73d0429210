//! End-to-end builds over temporary package trees.

use std::fs;
use std::path::{Path, PathBuf};

use respack_build::{
    run, BuildError, BuildOptions, BuildReport, ObjectStatus, OverwritePolicy, Registry,
};
use respack_convert::CopyConverter;
use respack_package::Package;
use serde_json::{json, Value};

/// A package tree in a temporary directory.
struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.write("game.package", r#"{ "title": "demo" }"#);
        fixture
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn declare(&self, rel: &str, declarations: Value) {
        self.write(rel, &declarations.to_string());
    }

    fn try_build(&self, registry: &Registry) -> Result<BuildReport, BuildError> {
        let options = BuildOptions {
            overwrite: OverwritePolicy::Allow,
        };
        run(&self.path("game.package"), registry, &options)
    }

    fn build(&self) -> BuildReport {
        self.try_build(&Registry::with_defaults()).unwrap()
    }

    fn output(&self, rel: &str) -> PathBuf {
        self.path("__output__").join(rel)
    }

    fn package(&self) -> Value {
        read_json(&self.output("data.package"))
    }

    fn intermediate_data(&self) -> Value {
        read_json(&self.path("__interm__/intermediate.data"))
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn resource_names(package: &Value) -> Vec<String> {
    package["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

/// Three plain text resources declared in one file.
fn three_strings(fx: &Fixture) {
    fx.write("text/a.txt", "alpha");
    fx.write("text/b.txt", "bravo!");
    fx.write("text/c.txt", "charlie");
    fx.declare(
        "text/strings.resources",
        json!([
            { "name": "a", "type": "string", "file": "a.txt", "parameters": { "lang": "en" } },
            { "name": "b", "type": "string", "file": "b.txt" },
            { "name": "c", "type": "string", "file": "c.txt" }
        ]),
    );
}

#[test]
fn first_build_converts_everything() {
    let fx = Fixture::new();
    three_strings(&fx);

    let report = fx.build();
    assert_eq!((report.converted, report.skipped, report.failed), (3, 0, 0));
    assert_eq!(fs::read_to_string(fx.output("b")).unwrap(), "bravo!");

    let package = fx.package();
    assert_eq!(package["title"], "demo");
    assert_eq!(resource_names(&package), ["a", "b", "c"]);
    assert_eq!(package["metrics"]["size"], 5 + 6 + 7);
    assert_eq!(
        package["resources"][1],
        json!({"name": "b", "type": "string", "file": "b", "size": 6})
    );

    let interm = fx.intermediate_data();
    assert_eq!(interm["next-idx"], 3);
    assert_eq!(interm["metadata"].as_object().unwrap().len(), 3);
}

#[test]
fn second_build_reuses_everything() {
    let fx = Fixture::new();
    three_strings(&fx);

    fx.build();
    let first: Vec<Vec<u8>> = ["a", "b", "c"].iter().map(|n| fs::read(fx.output(n)).unwrap()).collect();

    let report = fx.build();
    assert_eq!(report.converted, 0);
    assert_eq!(report.skipped, 3);
    let second: Vec<Vec<u8>> = ["a", "b", "c"].iter().map(|n| fs::read(fx.output(n)).unwrap()).collect();
    assert_eq!(first, second);
    assert_eq!(fx.intermediate_data()["next-idx"], 3);
}

#[test]
fn changed_params_reconvert_only_that_object() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.build();

    fx.declare(
        "text/strings.resources",
        json!([
            { "name": "a", "type": "string", "file": "a.txt", "parameters": { "lang": "de" } },
            { "name": "b", "type": "string", "file": "b.txt" },
            { "name": "c", "type": "string", "file": "c.txt" }
        ]),
    );
    let report = fx.build();
    assert_eq!(report.converted, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.object("a").unwrap().status, ObjectStatus::Converted);
    assert_eq!(report.object("b").unwrap().status, ObjectStatus::Cached);
}

#[test]
fn changed_source_reconverts_only_that_object() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.build();

    fx.write("text/c.txt", "charlie, again");
    let report = fx.build();
    assert_eq!(report.converted, 1);
    assert_eq!(report.object("c").unwrap().status, ObjectStatus::Converted);
    assert_eq!(fs::read_to_string(fx.output("c")).unwrap(), "charlie, again");
    assert_eq!(fx.package()["metrics"]["size"], 5 + 6 + 14);
}

#[test]
fn duplicate_names_abort_before_output() {
    let fx = Fixture::new();
    fx.write("one/a.txt", "1");
    fx.write("two/a.txt", "2");
    fx.declare("one/x.resource", json!({ "name": "a", "type": "string", "file": "a.txt" }));
    fx.declare("two/y.resource", json!({ "name": "a", "type": "string", "file": "a.txt" }));
    fx.write("compile.config", r#"{ "force-overwrite-output": true }"#);
    fx.write("__output__/keep.me", "previous build");

    let err = fx.try_build(&Registry::with_defaults()).unwrap_err();
    let BuildError::NamingConflict { conflicts } = err.root() else {
        panic!("expected a naming conflict");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].name, "a");
    assert!(conflicts[0].origins[0].ends_with("one/x.resource"));
    assert!(conflicts[0].origins[1].ends_with("two/y.resource"));
    assert!(err.to_string().starts_with("error while detecting naming conflicts"));

    assert_eq!(fs::read_to_string(fx.output("keep.me")).unwrap(), "previous build");
    assert!(!fx.output("data.package").exists());
    assert!(!fx.path("__interm__").exists());
}

#[test]
fn shader_fans_out_per_platform() {
    let fx = Fixture::new();
    fx.write("shaders/water.sc", "void main() {}");
    fx.declare(
        "shaders/water.resource",
        json!({ "name": "water", "type": "shader", "file": "water.sc",
                "parameters": { "type": "fragment", "platform": "all" } }),
    );
    let mut registry = Registry::with_defaults();
    registry.register_converter("shader", CopyConverter);

    let report = fx.try_build(&registry).unwrap();
    assert_eq!(report.converted, 7);
    let names = resource_names(&fx.package());
    assert_eq!(
        names,
        [
            "water#android",
            "water#asm.js",
            "water#ios",
            "water#linux",
            "water#nacl",
            "water#osx",
            "water#windows"
        ]
    );
    assert!(!fx.output("water").exists());
    assert!(fx.output("water#osx").exists());
    assert_eq!(
        report.object("water#ios").unwrap().params,
        json!({"type": "fragment", "platform": "ios"})
    );
}

#[test]
fn missing_source_fails_only_that_object() {
    let fx = Fixture::new();
    fx.write("text/a.txt", "alpha");
    fx.write("text/c.txt", "charlie");
    fx.declare(
        "text/strings.resources",
        json!([
            { "name": "a", "type": "string", "file": "a.txt" },
            { "name": "b", "type": "string", "file": "missing.txt" },
            { "name": "c", "type": "string", "file": "c.txt" }
        ]),
    );

    let report = fx.build();
    assert_eq!((report.converted, report.failed), (2, 1));
    assert_eq!(report.failures[0].name, "b");
    assert_eq!(report.total_size, 5 + 7);

    let package = fx.package();
    assert_eq!(resource_names(&package), ["a", "c"]);
    assert_eq!(package["metrics"]["size"], 12);
    assert!(!fx.output("b").exists());
}

#[test]
fn names_that_leave_the_output_dir_are_skipped() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("text/evil.txt", "payload");
    fx.declare(
        "text/evil.resources",
        json!([
            { "name": "../escaped", "type": "string", "file": "evil.txt" },
            { "name": "data.package", "type": "string", "file": "evil.txt" }
        ]),
    );

    let report = fx.build();
    assert_eq!((report.converted, report.failed), (3, 0));
    assert!(!fx.path("escaped").exists());

    let package = fx.package();
    assert_eq!(package["title"], "demo");
    assert_eq!(resource_names(&package), ["a", "b", "c"]);
}

#[test]
fn unknown_type_fails_only_that_object() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("art/hero.png", "png");
    fx.declare("art/hero.resource", json!({ "name": "hero", "type": "image", "file": "hero.png" }));

    let report = fx.build();
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].object_type, "image");
    assert!(report.failures[0].reason.contains("unknown type"));
    assert_eq!(resource_names(&fx.package()), ["a", "b", "c"]);
    assert_eq!(fx.intermediate_data()["metadata"].as_object().unwrap().len(), 3);
}

#[test]
fn obfuscated_names_are_sequential() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("compile.config", r#"{ "obfuscate": true }"#);

    fx.build();
    let package = fx.package();
    let files: Vec<_> = package["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["file"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(files, ["0", "1", "2"]);
    assert_eq!(fs::read_to_string(fx.output("1")).unwrap(), "bravo!");
    assert!(!fx.output("b").exists());
}

#[test]
fn tampered_params_under_same_key_are_not_trusted() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.build();

    // Keep every key but swap the stored params for "a", as a hash
    // collision would.
    let mut interm = fx.intermediate_data();
    let metadata = interm["metadata"].as_object_mut().unwrap();
    let key = metadata.keys().find(|k| k.starts_with("a|||")).unwrap().clone();
    metadata[&key]["params"] = json!({"lang": ["en"]});
    fs::write(
        fx.path("__interm__/intermediate.data"),
        serde_json::to_string(&interm).unwrap(),
    )
    .unwrap();

    let report = fx.build();
    assert_eq!(report.converted, 1);
    assert_eq!(report.object("a").unwrap().status, ObjectStatus::Converted);
    let interm = fx.intermediate_data();
    assert_eq!(interm["metadata"][&key]["params"], json!({"lang": "en"}));
    assert_eq!(interm["metadata"][&key]["file"], "3.r");
}

#[test]
fn always_retranslate_replaces_previous_artifact() {
    let fx = Fixture::new();
    fx.write("live.txt", "live");
    fx.declare(
        "live.resource",
        json!({ "name": "live", "type": "string", "file": "live.txt", "always-retranslate": true }),
    );

    let first = fx.build();
    let first_artifact = first.object("live").unwrap().intermediate_file.clone().unwrap();
    assert!(first_artifact.exists());

    let second = fx.build();
    assert_eq!(second.converted, 1);
    let second_artifact = second.object("live").unwrap().intermediate_file.clone().unwrap();
    assert_ne!(first_artifact, second_artifact);
    assert!(!first_artifact.exists());
    assert_eq!(fx.intermediate_data()["metadata"].as_object().unwrap().len(), 1);
}

#[test]
fn work_in_progress_types_skip_the_cache() {
    let fx = Fixture::new();
    three_strings(&fx);
    let mut registry = Registry::with_defaults();
    registry.mark_work_in_progress("string");

    fx.try_build(&registry).unwrap();
    let report = fx.try_build(&registry).unwrap();
    assert_eq!(report.converted, 3);
    assert_eq!(report.skipped, 0);
}

#[test]
fn ignored_directories_are_not_scanned() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("raw/a.txt", "shadow");
    fx.declare("raw/shadow.resource", json!({ "name": "a", "type": "string", "file": "a.txt" }));
    fx.write("compile.config", r#"{ "ignore": ["raw"] }"#);

    let report = fx.build();
    assert_eq!(report.converted, 3);
    assert_eq!(fs::read_to_string(fx.output("a")).unwrap(), "alpha");
}

#[test]
fn populated_output_needs_permission() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("__output__/stale", "old");

    let err = run(
        &fx.path("game.package"),
        &Registry::with_defaults(),
        &BuildOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.root(), BuildError::OutputExists { .. }));
    assert!(fx.output("stale").exists());

    fx.build();
    assert!(!fx.output("stale").exists());
}

#[test]
fn missing_package_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(
        &dir.path().join("nope.package"),
        &Registry::with_defaults(),
        &BuildOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.root(), BuildError::PackageNotFound { .. }));
    assert!(err.to_string().starts_with("error while loading package"));
}

#[test]
fn corrupt_intermediate_data_means_full_rebuild() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.build();
    fx.write("__interm__/intermediate.data", "{ truncated");

    let report = fx.build();
    assert_eq!(report.converted, 3);
    // Fresh slots start after the artifacts left by the first build.
    assert_eq!(fx.intermediate_data()["next-idx"], 6);
    let first = report.object("a").unwrap().intermediate_file.clone().unwrap();
    assert_eq!(first, fx.path("__interm__/3.r"));
    assert_eq!(fs::read_to_string(fx.output("b")).unwrap(), "bravo!");
}

#[test]
fn obfuscated_package_reads_back_by_name() {
    let fx = Fixture::new();
    three_strings(&fx);
    fx.write("compile.config", r#"{ "obfuscate": true, "output": "dist" }"#);
    fx.build();

    let package = Package::open(&fx.path("dist")).unwrap();
    assert_eq!(package.len(), 3);
    assert_eq!(package.read("c").unwrap(), b"charlie");
    assert_eq!(package.find("b").unwrap().path, fx.path("dist").join("1"));
}
