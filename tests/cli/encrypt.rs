//! Tests for `dotseal encrypt`.
#![cfg(unix)]

use crate::support::*;

#[test]
fn test_encrypt_creates_vault() {
    let t = Test::with_backend();
    t.write(".env", SAMPLE_ENV);

    let output = t.encrypt_force(&[]);
    assert_success(&output);

    assert_eq!(t.read(".env.vault"), SAMPLE_VAULT);
    assert!(t.backups(".env.vault").is_empty());
}

#[test]
fn test_encrypt_rewrites_only_changed_keys() {
    let t = Test::with_backend();
    t.write(
        ".env.vault",
        "# managed by ops\nA=enc:1\n\nB=enc:old # trailing\nGONE=enc:x\n",
    );
    t.write(".env", "A=1\nB=new\nC=3\n");

    let output = t.encrypt_force(&["--no-backup"]);
    assert_success(&output);

    assert_eq!(
        t.read(".env.vault"),
        "# managed by ops\nA=enc:1\n\nB=enc:new\nC=enc:3\n"
    );
    assert_stdout_contains(&output, "processed");
    assert_stdout_contains(&output, "3 of 3 changes");
}

#[test]
fn test_encrypt_takes_backup_of_existing_vault() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\n");
    t.write(".env", "A=2\n");

    let output = t.encrypt_force(&[]);
    assert_success(&output);

    let backups = t.backups(".env.vault");
    assert_eq!(backups.len(), 1);
    assert_eq!(t.read(&backups[0]), "A=enc:1\n");
    assert_eq!(t.read(".env.vault"), "A=enc:2\n");
    assert_stdout_contains(&output, "backup saved");
}

#[test]
fn test_encrypt_without_changes_writes_nothing() {
    let t = Test::with_backend();
    t.write(".env", SAMPLE_ENV);
    t.write(".env.vault", SAMPLE_VAULT);
    let before = t.files();

    let output = t.encrypt_force(&[]);
    assert_success(&output);

    assert_stdout_contains(&output, "no changes detected");
    assert_eq!(t.files(), before);
    assert_eq!(t.read(".env.vault"), SAMPLE_VAULT);
}

#[test]
fn test_encrypt_quiet_prints_only_outcome() {
    let t = Test::with_backend();
    t.write(".env", "A=1\nB=2\n");

    let output = t.encrypt_force(&["--quiet"]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(!out.contains("Changes"), "summary shown in quiet mode: {}", out);
    assert!(out.contains("wrote"));
}

#[test]
fn test_encrypt_custom_file_name() {
    let t = Test::with_backend();
    t.write(".env.production", "TOKEN=abc\n");

    let output = t.encrypt_force(&[".env.production"]);
    assert_success(&output);

    assert_eq!(t.read(".env.production.vault"), "TOKEN=enc:abc\n");
    assert!(!t.exists(".env.vault"));
}

#[test]
fn test_encrypt_prompt_requires_terminal() {
    let t = Test::with_backend();
    t.write(".env", "A=1\n");

    let output = t.run(&["encrypt"]);
    assert_failure(&output);

    assert_stderr_contains(&output, "--force");
    assert!(!t.exists(".env.vault"));
}

#[test]
fn test_vault_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_backend();
    t.write(".env", "A=1\n");

    assert_success(&t.encrypt_force(&[]));

    let mode = std::fs::metadata(t.path(".env.vault"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
