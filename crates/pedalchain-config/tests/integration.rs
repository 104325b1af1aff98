//! Preset store behaviour against a real directory.

use std::fs;

use pedalchain_config::{EffectStepSpec, PresetError, PresetStore, SCHEMA_VERSION};
use pedalchain_registry::Catalog;
use serde_json::{Map, json};

fn chain() -> Vec<EffectStepSpec> {
    vec![
        EffectStepSpec::new("gain").with_param("gain_db", 3),
        EffectStepSpec::new("Reverb").with_param("room_size", 0.8),
    ]
}

#[test]
fn save_then_load_returns_steps_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path().join("presets"));
    let catalog = Catalog::new(Vec::new(), false);

    let mut metadata = Map::new();
    metadata.insert("author".into(), json!("sam"));
    let saved = store
        .save(&catalog, "  Big Room ", "wide", chain(), metadata)
        .unwrap();

    assert_eq!(saved.name, "Big Room");
    assert_eq!(saved.schema_version, SCHEMA_VERSION);
    assert!(tmp.path().join("presets").join(format!("{}.json", saved.id)).is_file());

    assert_eq!(store.load(&saved.id).unwrap(), chain());
    let shown = store.show(&saved.id).unwrap();
    assert_eq!(shown, saved);
    assert_eq!(shown.metadata["author"], "sam");
}

#[test]
fn unknown_type_rejected_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let catalog = Catalog::new(Vec::new(), false);

    let mut steps = chain();
    steps.push(EffectStepSpec::new("vst3").with_param("plugin_path", "x.vst3"));
    let err = store.save(&catalog, "p", "", steps, Map::new()).unwrap_err();

    assert!(
        matches!(err, PresetError::UnknownEffectType { step: 3, ref type_id } if type_id == "vst3"),
        "{err}"
    );
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn blank_name_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let catalog = Catalog::new(Vec::new(), false);
    let err = store.save(&catalog, "   ", "", chain(), Map::new()).unwrap_err();
    assert!(matches!(err, PresetError::MissingName));
}

#[test]
fn load_does_not_revalidate_params() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let catalog = Catalog::new(Vec::new(), false);

    let steps = vec![EffectStepSpec::new("chorus").with_param("depth", 7.0)];
    let saved = store.save(&catalog, "odd", "", steps.clone(), Map::new()).unwrap();
    assert_eq!(store.load(&saved.id).unwrap(), steps);
}

#[test]
fn bad_ids_and_missing_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());

    assert!(matches!(store.load("../secrets"), Err(PresetError::InvalidId(_))));
    assert!(matches!(
        store.load("0123456789abcdef0123456789abcdef"),
        Err(PresetError::NotFound(_))
    ));
    assert!(matches!(
        store.delete("0123456789abcdef0123456789abcdef"),
        Err(PresetError::NotFound(_))
    ));
}

#[test]
fn future_schema_version_is_a_load_error() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let id = "00000000000000000000000000000001";
    fs::write(
        tmp.path().join(format!("{id}.json")),
        json!({
            "id": id, "name": "future", "created_at": "2030-01-01T00:00:00Z",
            "schema_version": 7, "effects": []
        })
        .to_string(),
    )
    .unwrap();

    assert!(matches!(
        store.load(id),
        Err(PresetError::UnsupportedSchemaVersion { version: 7, .. })
    ));
}

#[test]
fn copied_document_under_another_id_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let catalog = Catalog::new(Vec::new(), false);
    let saved = store.save(&catalog, "orig", "", chain(), Map::new()).unwrap();

    let alias = "ffffffffffffffffffffffffffffffff";
    fs::copy(
        tmp.path().join(format!("{}.json", saved.id)),
        tmp.path().join(format!("{alias}.json")),
    )
    .unwrap();

    assert!(matches!(store.show(alias), Err(PresetError::Parse { ref id, .. }) if id == alias));
    assert!(matches!(store.load(alias), Err(PresetError::Parse { .. })));
    let listed: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(listed, [saved.id]);
}

#[test]
fn save_leaves_only_the_published_document() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path().join("presets"));
    let catalog = Catalog::new(Vec::new(), false);
    let saved = store.save(&catalog, "one", "", chain(), Map::new()).unwrap();

    let names: Vec<String> = fs::read_dir(tmp.path().join("presets"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, [format!("{}.json", saved.id)]);
}

#[test]
fn list_is_newest_first_and_skips_malformed() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let write = |id: &str, name: &str, created: &str, steps: usize| {
        let effects: Vec<_> = (0..steps).map(|_| json!({"type": "invert"})).collect();
        let doc = json!({
            "id": id, "name": name, "description": "", "created_at": created,
            "schema_version": 1, "effects": effects
        });
        fs::write(tmp.path().join(format!("{id}.json")), doc.to_string()).unwrap();
    };
    write("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "old", "2024-01-01T00:00:00Z", 1);
    write("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", "new", "2025-06-01T00:00:00Z", 3);
    fs::write(tmp.path().join("cccccccccccccccccccccccccccccccc.json"), "{not json").unwrap();
    fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

    let list = store.list().unwrap();
    let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["new", "old"]);
    assert_eq!(list[0].effects_count, 3);
}

#[test]
fn delete_removes_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path());
    let catalog = Catalog::new(Vec::new(), false);
    let saved = store.save(&catalog, "tmp", "", chain(), Map::new()).unwrap();

    store.delete(&saved.id).unwrap();
    assert!(matches!(store.show(&saved.id), Err(PresetError::NotFound(_))));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn missing_store_dir_lists_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = PresetStore::new(tmp.path().join("never-created"));
    assert!(store.list().unwrap().is_empty());
}
