use std::fs;

use prefpatch::run::execute;
use prefpatch::PrefValue;

use crate::support::{base_options, registry_root, statement_lines, workspace};

#[test]
fn supplement_is_appended_verbatim_after_the_merge() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default");
    let supplement = ws.path().join("local-overrides.js");
    fs::write(
        &supplement,
        "// my additions\nstatement(\"network.mode\", 3);\n",
    )
    .unwrap();

    let mut options = base_options(vec![root]);
    options.entries = vec![("network.mode".to_string(), PrefValue::Int(5))];
    options.supplemental_path = Some(supplement);
    let report = execute(&options).expect("run failed");
    assert!(report.supplemental_applied);

    let text = fs::read_to_string(&report.override_path).unwrap();
    // Both statements survive: deduplication is the host application's
    // last-statement-wins job, not ours.
    let statements = statement_lines(&text);
    assert_eq!(
        statements,
        vec![
            "statement(\"network.mode\", 5);".to_string(),
            "statement(\"network.mode\", 3);".to_string(),
        ]
    );
    assert!(text.contains("// my additions"));
    let merged_pos = text.find("statement(\"network.mode\", 5);").unwrap();
    let appended_pos = text.find("// my additions").unwrap();
    assert!(merged_pos < appended_pos);
}

#[test]
fn missing_supplement_is_reported_not_fatal() {
    let ws = workspace();
    let root = registry_root(ws.path(), "native", "main.default");

    let mut options = base_options(vec![root]);
    options.entries = vec![("a".to_string(), PrefValue::Bool(true))];
    options.supplemental_path = Some(ws.path().join("does-not-exist.js"));
    let report = execute(&options).expect("run failed");
    assert!(!report.supplemental_applied);
}
