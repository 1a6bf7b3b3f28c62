use std::fs;

use prefpatch::prefs::statement_key;
use prefpatch::run::execute;
use prefpatch::PrefValue;

use crate::support::{base_options, registry_root, statement_lines, workspace};

#[test]
fn fresh_profile_batch_applies_in_first_seen_key_order() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default-release");

    let mut options = base_options(vec![root]);
    options.entries = vec![
        ("a.b".to_string(), PrefValue::Bool(true)),
        ("c.d".to_string(), PrefValue::Int(3)),
        ("a.b".to_string(), PrefValue::Bool(false)),
    ];
    let report = execute(&options).expect("pipeline run failed");
    assert_eq!(report.applied, 3);

    let text = fs::read_to_string(&report.override_path).expect("override file missing");
    let statements = statement_lines(&text);
    // Later entries for the same key win in place; first-seen-key order holds.
    assert_eq!(
        statements,
        vec![
            "statement(\"a.b\", false);".to_string(),
            "statement(\"c.d\", 3);".to_string(),
        ]
    );
    // The header block precedes every statement.
    assert!(text.starts_with("// browser preference overrides\n"));
    let first_statement = text.lines().position(|l| l.starts_with("statement(")).unwrap();
    assert!(text
        .lines()
        .take(first_statement)
        .all(|l| l.starts_with("//") || l.is_empty()));
}

#[test]
fn repeated_runs_never_duplicate_keys() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default");

    let mut options = base_options(vec![root]);
    options.entries = vec![
        ("privacy.resist".to_string(), PrefValue::Bool(true)),
        ("network.mode".to_string(), PrefValue::Int(5)),
        ("home.page".to_string(), PrefValue::Str("about:blank".into())),
    ];
    options.backup_root = Some(ws.path().join("backups-1"));
    let first = execute(&options).expect("first run failed");
    let after_first = fs::read_to_string(&first.override_path).unwrap();

    // Same-second reruns must not collide with the first snapshot.
    options.backup_root = Some(ws.path().join("backups-2"));
    let second = execute(&options).expect("second run failed");
    let after_second = fs::read_to_string(&second.override_path).unwrap();

    assert_eq!(statement_lines(&after_first), statement_lines(&after_second));
    for key in ["privacy.resist", "network.mode", "home.page"] {
        let hits = after_second
            .lines()
            .filter(|l| statement_key(l).as_deref() == Some(key))
            .count();
        assert_eq!(hits, 1, "expected exactly one statement for {key}");
    }
}

#[test]
fn rerun_preserves_unrelated_lines_and_positions() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default");
    let profile = root.join("main.default");
    fs::write(
        profile.join("overrides.js"),
        "// hand-written header\nstatement(\"keep.me\", 1);\n\n// trailing note\n",
    )
    .unwrap();

    let mut options = base_options(vec![root]);
    options.entries = vec![("keep.me".to_string(), PrefValue::Int(2))];
    let report = execute(&options).expect("run failed");

    let text = fs::read_to_string(&report.override_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "// hand-written header");
    assert_eq!(lines[1], "statement(\"keep.me\", 2);");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "// trailing note");
}

#[test]
fn dry_run_touches_nothing() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default");

    let mut options = base_options(vec![root.clone()]);
    options.entries = vec![("a".to_string(), PrefValue::Bool(true))];
    options.dry_run = true;
    let report = execute(&options).expect("dry run failed");

    assert!(report.backup_dir.is_none());
    assert!(!report.override_path.exists());
    assert_eq!(report.profile.root_dir, root);
}
