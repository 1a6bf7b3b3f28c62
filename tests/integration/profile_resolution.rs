use std::fs;
use std::path::PathBuf;

use prefpatch::locator::resolve;
use prefpatch::run::execute;
use prefpatch::{Error, PrefValue};

use crate::support::{base_options, workspace};

fn seeded_profile(root: &PathBuf, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("prefs.js"), "// prefs\n").unwrap();
    dir
}

#[test]
fn registry_default_flag_beats_declaration_order() {
    let ws = workspace();
    let root = ws.path().join("native");
    seeded_profile(&root, "first.default");
    let marked = seeded_profile(&root, "second.default-release");
    fs::write(
        root.join("profiles.ini"),
        "[Profile0]\nPath=first.default\n\n[Profile1]\nPath=second.default-release\nDefault=1\n",
    )
    .unwrap();

    let resolved = resolve(&[root]).unwrap();
    assert_eq!(resolved.profile_dir, marked);
}

#[test]
fn fallback_scan_follows_root_then_pattern_order() {
    let ws = workspace();
    let native = ws.path().join("native");
    let sandboxed = ws.path().join("sandboxed");
    // No registry anywhere; the lower-priority name in the first root must
    // still win over the higher-priority name in the second.
    let expected = seeded_profile(&native, "abc.default");
    seeded_profile(&sandboxed, "xyz.default-release");

    let resolved = resolve(&[native, sandboxed]).unwrap();
    assert_eq!(resolved.profile_dir, expected);
}

#[test]
fn pipeline_aborts_before_mutation_when_nothing_resolves() {
    let ws = workspace();
    let empty_root = ws.path().join("nothing-here");
    fs::create_dir_all(&empty_root).unwrap();

    let mut options = base_options(vec![empty_root.clone()]);
    options.entries = vec![("a".to_string(), PrefValue::Bool(true))];
    let err = execute(&options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ProfileNotFound)
    ));
    // No backup directory, no override file: the run failed before any
    // filesystem mutation.
    let leftovers: Vec<_> = fs::read_dir(&empty_root).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn malformed_registry_recovers_through_scan() {
    let ws = workspace();
    let root = ws.path().join("native");
    let fallback = seeded_profile(&root, "rescue.default-esr");
    fs::write(root.join("profiles.ini"), "garbage that is not ini\n").unwrap();

    let mut options = base_options(vec![root]);
    options.entries = vec![("k".to_string(), PrefValue::Int(1))];
    let report = execute(&options).expect("fallback run failed");
    assert_eq!(report.profile.profile_dir, fallback);
}
