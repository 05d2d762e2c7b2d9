use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chargen_tags::app::ports::{FormResolver, ResourceProvider};
use chargen_tags::infra::{FormTable, FsResourceProvider, LoadOrder};
use chargen_tags::{FileFamily, FormId, LoadError, LoadReport, PartTag, TagLoader, TagRegistry};
use tempfile::tempdir;

fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
}

fn fixture_table() -> FormTable {
    let order = LoadOrder::from_file(&resources_dir().join("plugins.txt")).unwrap();
    FormTable::new(order).accept_all_local_ids()
}

/// Wraps a provider and records every path it is asked to open
struct RecordingResources<P> {
    inner: P,
    opened: Mutex<Vec<PathBuf>>,
}

impl<P: ResourceProvider> ResourceProvider for RecordingResources<P> {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        self.inner.open(path)
    }
}

#[test]
fn test_load_mods_from_fixture_tree() {
    let table = fixture_table();
    assert_eq!(
        table.load_order().packages(),
        ["Skyrim.esm", "Hair.esp", "Broken.esp", "Brows.esp"]
    );

    let registry = TagRegistry::new();
    let resources = FsResourceProvider::new(resources_dir().join("Data"));
    TagLoader::new(&registry, &table, table.load_order(), &resources).load_mods();

    let hair = table.resolve_identifier("Hair.esp|0x000D62").unwrap();
    assert_eq!(hair, FormId(0x0100_0D62));
    assert_eq!(registry.tags(hair), vec!["female", "long"]);
    assert_eq!(registry.tags(FormId(0x0100_0D63)), vec!["male"]);
    assert_eq!(registry.tags(FormId(0x0300_0001)), vec!["female", "thin"]);

    // Broken.esp failed to parse; Retired.esp is not in the load order
    assert!(!registry.has_tags(FormId(0x0200_0001)));
    assert_eq!(registry.form_count(), 3);

    // Brows.esp loads after Hair.esp and relabels "long" in place
    assert_eq!(
        registry.part_tags(3),
        vec![
            PartTag::new("long", "Very Long Hair"),
            PartTag::new("braided", "braided"),
        ]
    );
    assert_eq!(
        registry.part_tags(6),
        vec![PartTag::new("thin", "thin"), PartTag::new("arched", "arched")]
    );
}

#[test]
fn test_all_tag_files_load_before_any_part_file() {
    let table = fixture_table();
    let registry = TagRegistry::new();
    let resources = RecordingResources {
        inner: FsResourceProvider::new(resources_dir().join("Data")),
        opened: Mutex::new(Vec::new()),
    };
    let loader = TagLoader::new(&registry, &table, table.load_order(), &resources);
    loader.load_mods();

    let opened = resources.opened.lock().unwrap().clone();
    let packages = table.load_order().packages();
    let mut expected: Vec<PathBuf> = packages
        .iter()
        .map(|p| loader.package_file(p, FileFamily::Tags))
        .collect();
    expected.extend(packages.iter().map(|p| loader.package_file(p, FileFamily::Parts)));
    assert_eq!(opened, expected);
}

#[test]
fn test_unresolved_entry_does_not_fail_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tags.json");
    fs::write(
        &path,
        r#"{
            "Hair.esp|0x1": "a",
            "Hair.esp|0x2": ["b", "c"],
            "Gone.esp|0x3": "d"
        }"#,
    )
    .unwrap();

    let table = FormTable::new(LoadOrder::new(["Hair.esp"])).accept_all_local_ids();
    let registry = TagRegistry::new();
    let resources = FsResourceProvider::new(dir.path());
    let loader = TagLoader::new(&registry, &table, table.load_order(), &resources);

    let report = loader.load_tag_file(Path::new("tags.json")).unwrap();
    assert_eq!(report.applied, 3);
    assert_eq!(report.unresolved, 1);
    let total: usize = registry.forms().iter().map(|f| registry.tags(*f).len()).sum();
    assert_eq!(total, 3);
}

#[test]
fn test_reloading_same_file_rejects_duplicates() {
    let table = fixture_table();
    let registry = TagRegistry::new();
    let resources = FsResourceProvider::new(resources_dir().join("Data"));
    let loader = TagLoader::new(&registry, &table, table.load_order(), &resources);
    let path = loader.package_file("Hair.esp", FileFamily::Tags);

    let first = loader.load_tag_file(&path).unwrap();
    let second = loader.load_tag_file(&path).unwrap();
    assert_eq!(
        first,
        LoadReport {
            applied: 3,
            rejected: 1,
            unresolved: 1
        }
    );
    assert_eq!(
        second,
        LoadReport {
            applied: 0,
            rejected: 4,
            unresolved: 1
        }
    );
}

#[test]
fn test_error_kinds_per_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("malformed.json"), "{ \"parts\": [ }").unwrap();
    fs::write(dir.path().join("array_root.json"), "[1, 2]").unwrap();

    let table = FormTable::new(LoadOrder::default());
    let registry = TagRegistry::new();
    let resources = FsResourceProvider::new(dir.path());
    let loader = TagLoader::new(&registry, &table, table.load_order(), &resources);

    assert!(matches!(
        loader.load_part_file(Path::new("missing.json")),
        Err(LoadError::Open { .. })
    ));
    assert!(matches!(
        loader.load_part_file(Path::new("malformed.json")),
        Err(LoadError::Parse { .. })
    ));
    assert!(matches!(
        loader.load_tag_file(Path::new("array_root.json")),
        Err(LoadError::Traversal { .. })
    ));
}

#[test]
fn test_custom_plugins_root() {
    let dir = tempdir().unwrap();
    let package_dir = dir.path().join("plugins/CharGen/Tags/Hair.esp");
    fs::create_dir_all(&package_dir).unwrap();
    fs::write(package_dir.join("parts.json"), r#"{"parts": [{"type": 9, "tags": ["x"]}]}"#).unwrap();

    let table = FormTable::new(LoadOrder::new(["Hair.esp"]));
    let registry = TagRegistry::new();
    let resources = FsResourceProvider::new(dir.path());
    TagLoader::new(&registry, &table, table.load_order(), &resources)
        .with_plugins_root("plugins")
        .load_mods();

    assert!(registry.has_part_tag(9, "x"));
}
