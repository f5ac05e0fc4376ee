use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_init_and_passthrough_build() {
    let dir = tempfile::tempdir().unwrap();

    // Init project
    cargo_bin_cmd!("glyphweave")
        .args(["init", dir.path().to_str().unwrap(), "--name", "@acme/icons"])
        .assert()
        .success();

    // Verify generated files exist
    assert!(dir.path().join("glyphweave.yaml").exists());
    assert!(dir.path().join("metadata.json").exists());
    assert!(dir.path().join(".gitignore").exists());

    cargo_bin_cmd!("glyphweave")
        .args(["--config", dir.path().to_str().unwrap(), "validate"])
        .assert()
        .success();

    cargo_bin_cmd!("glyphweave")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "build",
            "--passthrough",
        ])
        .assert()
        .success();

    let dist = dir.path().join("dist");
    let index = std::fs::read_to_string(dist.join("es/index.js")).unwrap();
    assert!(index.contains("export { default as Icon } from './Icon.js';"));
    assert!(index.contains("export { Add16 } from './__generated__/bucket-0.js';"));

    let bucket = std::fs::read_to_string(dist.join("lib/__generated__/bucket-0.js")).unwrap();
    assert!(bucket.contains("const didWarnAboutDeprecation = {};"));
    assert!(bucket.contains("@acme/icons"));

    let module = std::fs::read_to_string(dist.join("es/Close16.js")).unwrap();
    assert!(module.contains("let didWarnAboutDeprecation = false;"));
    assert!(module.contains("export default Close16;"));

    assert!(dist.join("umd/index.js").is_file());
    assert!(dist.join(".glyphweave-hash").is_file());

    // Second build is a no-op
    cargo_bin_cmd!("glyphweave")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "build",
            "--passthrough",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("is up to date"));
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("glyphweave")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();

    cargo_bin_cmd!("glyphweave")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains a glyphweave.yaml"));
}

#[test]
fn test_emit_writes_sources() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");

    cargo_bin_cmd!("glyphweave")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();

    cargo_bin_cmd!("glyphweave")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "emit",
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out.join("index.js").is_file());
    assert!(out.join("Icon.js").is_file());
    assert!(out.join("Add16.js").is_file());
    assert!(out.join("__generated__/bucket-0.js").is_file());
}

#[test]
fn test_validate_reports_duplicate_module_names() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("glyphweave")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();

    let metadata = r#"{"icons": [
        {"output": [{"moduleName": "Add16", "filepath": "Add16.js",
          "descriptor": {"attrs": {"width": 16, "height": 16, "viewBox": "0 0 16 16"}}}]},
        {"output": [{"moduleName": "Add16", "filepath": "other/Add16.js",
          "descriptor": {"attrs": {"width": 16, "height": 16, "viewBox": "0 0 16 16"}}}]}
    ]}"#;
    std::fs::write(dir.path().join("metadata.json"), metadata).unwrap();

    cargo_bin_cmd!("glyphweave")
        .args(["--config", dir.path().to_str().unwrap(), "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate module name 'Add16'"));

    cargo_bin_cmd!("glyphweave")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "build",
            "--passthrough",
        ])
        .assert()
        .failure();
}
