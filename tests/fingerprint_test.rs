use schema_breaking_changes::snapshot::{Compatibility, Snapshot};
use schema_breaking_changes::{ProviderSchema, generate_fingerprint};
use std::io::Write;

fn load(file_name: &str) -> Snapshot {
    Snapshot::try_from_file(format!("tests/data/{file_name}")).expect("Could not load test schema file")
}

#[test]
fn test_fingerprint_consistency_for_identical_files() {
    let hash1 = load("old.json").fingerprint;
    let hash2 = load("old.json").fingerprint;

    assert_eq!(hash1, hash2);
    assert_eq!(hash1.len(), 64);
}

#[test]
fn test_fingerprint_ignores_key_order() {
    let a = load("old.json");
    let a_reordered = load("old_reordered.json");

    assert_eq!(a.fingerprint, a_reordered.fingerprint);
}

#[test]
fn test_fingerprint_detects_changes() {
    let a = load("old.json");
    let b = load("new_compatible.json");

    assert_ne!(a.fingerprint, b.fingerprint);
}

#[test]
fn test_fingerprint_of_empty_schema() {
    let empty = generate_fingerprint(&ProviderSchema::default()).unwrap();
    let other = generate_fingerprint(&ProviderSchema::default()).unwrap();
    assert_eq!(empty, other);
}

#[test]
fn test_compare_identical_is_green() {
    let a = load("old.json");
    let a_reordered = load("old_reordered.json");

    assert_eq!(a.compare_with(&a_reordered), Compatibility::Green);
}

#[test]
fn test_compare_additions_is_yellow() {
    let old = load("old.json");
    let new = load("new_compatible.json");

    assert_eq!(old.compare_with(&new), Compatibility::Yellow);
    let result = old.check_breaking_changes(&new);
    assert!(!result.has_breaking_changes);
    assert!(!old.diff(&new).is_empty());
}

#[test]
fn test_compare_breaking_is_red() {
    let old = load("old.json");
    let new = load("new_breaking.yaml");

    assert_eq!(old.compare_with(&new), Compatibility::Red);

    let result = old.check_breaking_changes(&new);
    let mut messages: Vec<&str> = result.changes.iter().map(|c| c.message.as_str()).collect();
    messages.sort();
    assert_eq!(
        messages,
        vec![
            "Field `labels` changed from TypeMap.TypeString to TypeMap.TypeInt on `google_storage_bucket`",
            "Field `location` transitioned from optional+computed to optional `google_storage_bucket`",
            "Field `versioning.enabled` within resource `google_storage_bucket` was either removed or renamed",
            "Field `versioning` within resource `google_storage_bucket` was either removed or renamed",
            "Resource `google_pubsub_topic` was either removed or renamed",
        ]
    );
    assert_eq!(result.summary.get("google_storage_bucket"), Some(&4));
    assert_eq!(result.summary.get("google_pubsub_topic"), Some(&1));
}

#[test]
fn test_load_from_temp_file() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(
        file,
        "resources:\n  google_x:\n    schema:\n      field_a:\n        type: TypeString\n        optional: true"
    )
    .unwrap();

    let snapshot = Snapshot::try_from_file(file.path()).unwrap();
    assert!(snapshot.schema.resources["google_x"].schema["field_a"].optional);
}

#[test]
fn test_load_missing_file_fails() {
    let err = Snapshot::try_from_file("tests/data/does_not_exist.json").unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}
