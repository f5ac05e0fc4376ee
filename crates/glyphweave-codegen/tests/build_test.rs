//! End-to-end generation and bundling tests
//!
//! Exercises the planner, bucketer and assembler together through the
//! `Builder`, and the output driver against the passthrough bundler.

use async_trait::async_trait;
use glyphweave_codegen::bundler::OutputOptions;
use glyphweave_codegen::{
    BuildOptions, Builder, Bundle, BundleInput, Bundler, Error, PassthroughBundler,
};
use glyphweave_core::{AttrValue, Attributes, Catalog, Descriptor, DrawingNode, IconRecord, SizeVariant};
use std::sync::{Arc, Mutex};

fn descriptor(size: u32) -> Descriptor {
    let mut attrs = Attributes::new();
    attrs.insert("width".into(), size.into());
    attrs.insert("height".into(), size.into());
    attrs.insert("viewBox".into(), format!("0 0 {size} {size}").into());

    let mut path = Attributes::new();
    path.insert("d".into(), AttrValue::from("M1 1h2v2H1z"));

    Descriptor {
        attrs,
        content: vec![DrawingNode {
            elem: "path".to_string(),
            attrs: path,
        }],
    }
}

fn icon(name: &str, deprecated: bool) -> IconRecord {
    IconRecord {
        name: Some(name.to_lowercase()),
        deprecated,
        output: vec![SizeVariant {
            module_name: format!("{name}16"),
            filepath: format!("{name}16.js"),
            descriptor: descriptor(16),
        }],
    }
}

fn catalog_of(count: usize) -> Catalog {
    Catalog {
        icons: (0..count).map(|i| icon(&format!("Glyph{i}"), false)).collect(),
    }
}

fn options(output_dir: &std::path::Path) -> BuildOptions {
    BuildOptions {
        output_dir: output_dir.to_path_buf(),
        banner: "/** test banner */".to_string(),
        package: "@acme/icons-react".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_scale_5000_modules_into_20_buckets() {
    let builder = Builder::new(options(std::path::Path::new("unused")));
    let assembly = builder.generate(&catalog_of(5000)).unwrap();

    assert_eq!(assembly.module_count, 5000);
    assert_eq!(assembly.bucket_count, 20);

    let root = assembly.files.get("index.js").unwrap();
    let reexports: Vec<&str> = root
        .lines()
        .filter(|line| line.starts_with("export { Glyph"))
        .collect();
    assert_eq!(reexports.len(), 5000);

    for (index, line) in reexports.iter().enumerate() {
        let expected = format!(
            "export {{ Glyph{index}16 }} from './__generated__/bucket-{}.js';",
            index / 250
        );
        assert_eq!(*line, expected);
    }

    for bucket in 0..20 {
        let source = assembly
            .files
            .get(&format!("__generated__/bucket-{bucket}.js"))
            .unwrap();
        assert_eq!(source.matches("React.forwardRef(").count(), 250);
    }
    assert!(assembly.files.get("__generated__/bucket-20.js").is_none());
}

#[test]
fn test_regeneration_is_byte_identical() {
    let catalog = Catalog {
        icons: vec![icon("Add", false), icon("Close", true), icon("Menu", false)],
    };
    let builder = Builder::new(BuildOptions {
        bucket_size: 2,
        ..options(std::path::Path::new("unused"))
    });

    let first = builder.generate(&catalog).unwrap();
    let second = builder.generate(&catalog).unwrap();

    let a: Vec<_> = first.files.iter().collect();
    let b: Vec<_> = second.files.iter().collect();
    assert_eq!(a, b);
    assert_eq!(first.files.content_hash(), second.files.content_hash());
}

#[test]
fn test_deprecation_guards_are_scoped_per_file() {
    let catalog = Catalog {
        icons: vec![
            icon("Old", true),
            icon("Older", true),
            icon("Oldest", true),
            icon("Fresh", false),
        ],
    };
    let builder = Builder::new(options(std::path::Path::new("unused")));
    let assembly = builder.generate(&catalog).unwrap();

    let bucket = assembly.files.get("__generated__/bucket-0.js").unwrap();
    assert_eq!(bucket.matches("const didWarnAboutDeprecation = {};").count(), 1);
    assert!(!bucket.contains("let didWarnAboutDeprecation"));
    for name in ["Old16", "Older16", "Oldest16"] {
        let key = format!("didWarnAboutDeprecation['{name}']");
        assert!(bucket.contains(&format!("if (!{key})")));
        assert_eq!(bucket.matches(&format!("{key} = true;")).count(), 1);
    }
    assert!(!bucket.contains("didWarnAboutDeprecation['Fresh16']"));

    let standalone = assembly.files.get("Old16.js").unwrap();
    assert_eq!(standalone.matches("let didWarnAboutDeprecation = false;").count(), 1);
    assert!(!standalone.contains("Older16"));
    assert!(standalone.contains("@acme/icons-react"));

    let fresh = assembly.files.get("Fresh16.js").unwrap();
    assert!(!fresh.contains("didWarnAboutDeprecation"));
}

#[test]
fn test_duplicate_module_names_fail_generation() {
    let catalog = Catalog {
        icons: vec![icon("Add", false), icon("Add", true)],
    };
    let builder = Builder::new(options(std::path::Path::new("unused")));
    assert!(matches!(
        builder.generate(&catalog),
        Err(Error::DuplicateModule { .. })
    ));
}

#[tokio::test]
async fn test_build_with_passthrough_bundler() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    let builder = Builder::new(options(&out));

    let report = builder
        .build(&catalog_of(3), &PassthroughBundler)
        .await
        .unwrap();

    assert_eq!(report.module_count, 3);
    assert_eq!(report.bucket_count, 1);
    assert!(!report.skipped);

    for subdir in ["es", "lib"] {
        assert!(out.join(subdir).join("index.js").is_file());
        assert!(out.join(subdir).join("Glyph016.js").is_file());
        assert!(out.join(subdir).join("__generated__/bucket-0.js").is_file());
    }

    let umd = std::fs::read_to_string(out.join("umd/index.js")).unwrap();
    assert!(umd.contains("export { Glyph216 } from './__generated__/bucket-0.js';"));

    let stamp = std::fs::read_to_string(out.join(".glyphweave-hash")).unwrap();
    assert_eq!(stamp, report.hash);
}

#[tokio::test]
async fn test_build_prunes_stray_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    std::fs::create_dir_all(out.join("es/_virtual")).unwrap();
    std::fs::create_dir_all(out.join("lib/node_modules/helpers")).unwrap();

    let catalog = Catalog {
        icons: vec![IconRecord {
            name: None,
            deprecated: false,
            output: vec![SizeVariant {
                module_name: "Nested16".to_string(),
                filepath: "nested/16.js".to_string(),
                descriptor: descriptor(16),
            }],
        }],
    };

    Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();

    for subdir in ["es", "lib"] {
        assert!(out.join(subdir).join("__generated__").is_dir());
        assert!(!out.join(subdir).join("_virtual").exists());
        assert!(!out.join(subdir).join("node_modules").exists());
        assert!(!out.join(subdir).join("nested").exists());
    }
}

#[tokio::test]
async fn test_unchanged_build_is_skipped_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    let catalog = catalog_of(2);

    let first = Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();
    let second = Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();
    assert!(second.skipped);
    assert_eq!(first.hash, second.hash);

    let forced = Builder::new(BuildOptions {
        force: true,
        ..options(&out)
    })
    .build(&catalog, &PassthroughBundler)
    .await
    .unwrap();
    assert!(!forced.skipped);
}

/// Counts writes, failing every one of them when `fail` is set
#[derive(Default)]
struct RecordingBundler {
    fail: bool,
    writes: Arc<Mutex<usize>>,
}

impl RecordingBundler {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

struct RecordingBundle {
    fail: bool,
    writes: Arc<Mutex<usize>>,
}

#[async_trait]
impl Bundler for RecordingBundler {
    fn fingerprint(&self) -> String {
        "recording".to_string()
    }

    async fn bundle(&self, _input: BundleInput<'_>) -> glyphweave_codegen::Result<Box<dyn Bundle>> {
        Ok(Box::new(RecordingBundle {
            fail: self.fail,
            writes: Arc::clone(&self.writes),
        }))
    }
}

#[async_trait]
impl Bundle for RecordingBundle {
    async fn write(&self, _options: &OutputOptions) -> glyphweave_codegen::Result<()> {
        *self.writes.lock().unwrap() += 1;
        if self.fail {
            return Err(Error::BundleError {
                message: "syntax error in Glyph016.js".to_string(),
                stderr: None,
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_bundling_failure_propagates_without_retry() {
    let bundler = RecordingBundler::failing();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");

    let err = Builder::new(options(&out))
        .build(&catalog_of(1), &bundler)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BundleError { .. }));
    assert_eq!(bundler.writes(), 1);
    assert!(!out.join(".glyphweave-hash").exists());
    assert!(!out.join("umd/index.js").exists());
}

#[tokio::test]
async fn test_passthrough_output_is_not_reused_by_another_bundler() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    let catalog = catalog_of(2);

    Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();

    let bundler = RecordingBundler::default();
    let report = Builder::new(options(&out))
        .build(&catalog, &bundler)
        .await
        .unwrap();

    assert!(!report.skipped);
    assert_eq!(bundler.writes(), 3);
}

#[tokio::test]
async fn test_changed_output_settings_force_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    let catalog = catalog_of(2);

    Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();

    let renamed = Builder::new(BuildOptions {
        universal_name: "Renamed".to_string(),
        ..options(&out)
    })
    .build(&catalog, &PassthroughBundler)
    .await
    .unwrap();
    assert!(!renamed.skipped);

    let externals = Builder::new(BuildOptions {
        universal_name: "Renamed".to_string(),
        externals: vec!["react".to_string(), "lodash".to_string()],
        ..options(&out)
    })
    .build(&catalog, &PassthroughBundler)
    .await
    .unwrap();
    assert!(!externals.skipped);
    assert_ne!(renamed.hash, externals.hash);
}

#[tokio::test]
async fn test_failed_forced_build_discards_stamp() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist");
    let catalog = catalog_of(2);

    Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();
    assert!(out.join(".glyphweave-hash").exists());

    let bundler = RecordingBundler::failing();
    Builder::new(BuildOptions {
        force: true,
        ..options(&out)
    })
    .build(&catalog, &bundler)
    .await
    .unwrap_err();
    assert!(!out.join(".glyphweave-hash").exists());

    let rebuilt = Builder::new(options(&out))
        .build(&catalog, &PassthroughBundler)
        .await
        .unwrap();
    assert!(!rebuilt.skipped);
}

#[test]
fn test_filepath_outside_package_rejected() {
    let catalog = Catalog {
        icons: vec![IconRecord {
            name: None,
            deprecated: false,
            output: vec![SizeVariant {
                module_name: "Escape16".to_string(),
                filepath: "../Escape16.js".to_string(),
                descriptor: descriptor(16),
            }],
        }],
    };

    let builder = Builder::new(options(std::path::Path::new("unused")));
    assert!(matches!(
        builder.generate(&catalog),
        Err(Error::InvalidPath { .. })
    ));
}
