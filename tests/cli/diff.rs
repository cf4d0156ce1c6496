//! Tests for `dotseal diff` and completions.

use crate::support::*;

#[cfg(unix)]
#[test]
fn test_diff_lists_changes() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\nB=enc:2\nGONE=enc:x\n");
    t.write(".env", "A=1\nB=changed\nNEW=3\n");
    let before = t.files();

    let output = t.diff(&[]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("+ NEW = 3"), "{}", out);
    assert!(out.contains("~ B: 2 → changed"), "{}", out);
    assert!(out.contains("- GONE"), "{}", out);
    assert!(out.contains("1 unchanged"), "{}", out);
    assert_eq!(t.files(), before);
}

#[cfg(unix)]
#[test]
fn test_diff_json_has_no_values() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\n");
    t.write(".env", "A=secret-value\n");

    let output = t.diff(&["--json"]);
    assert_success(&output);

    let out = stdout(&output);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["direction"], "encrypt");
    assert_eq!(json["changes"][0]["key"], "A");
    assert_eq!(json["changes"][0]["kind"], "modified");
    assert_eq!(json["unchanged"], 0);
    assert!(!out.contains("secret-value"));
}

#[cfg(unix)]
#[test]
fn test_diff_decrypt_direction() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\nB=enc:2\n");
    t.write(".env", "A=1\n");

    let output = t.diff(&["--decrypt", "--json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["direction"], "decrypt");
    assert_eq!(json["changes"][0]["key"], "B");
    assert_eq!(json["changes"][0]["kind"], "added");
}

#[cfg(unix)]
#[test]
fn test_diff_in_sync() {
    let t = Test::with_backend();
    t.write(".env", SAMPLE_ENV);
    t.write(".env.vault", SAMPLE_VAULT);

    let output = t.diff(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "no changes detected");
}

#[test]
fn test_completions() {
    let t = Test::new();

    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    assert_stdout_contains(&output, "dotseal");
}
