//! Tests for `dotseal decrypt`.
#![cfg(unix)]

use crate::support::*;

#[test]
fn test_decrypt_creates_env() {
    let t = Test::with_backend();
    t.write(".env.vault", SAMPLE_VAULT);

    let output = t.decrypt_force(&[]);
    assert_success(&output);

    assert_eq!(
        t.read(".env"),
        "DATABASE_URL=postgres://localhost/app\nAPI_KEY=sk-test-1\nDEBUG=true\n"
    );
}

#[test]
fn test_decrypt_keeps_local_comments_and_order() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\nB=enc:2\nC=enc:3\n");
    t.write(".env", "# local notes\nC=3\n\nB=old\nA=1\n");

    let output = t.decrypt_force(&["--no-backup"]);
    assert_success(&output);

    assert_eq!(t.read(".env"), "# local notes\nC=3\n\nB=2\nA=1\n");
}

#[test]
fn test_decrypt_preserves_crlf() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\nB=enc:2\nC=enc:3\n");
    t.write(".env", "A=1\r\nB=old\r\n");

    assert_success(&t.decrypt_force(&["--no-backup"]));

    assert_eq!(t.read(".env"), "A=1\r\nB=2\r\nC=3\r\n");
}

#[test]
fn test_decrypt_removes_keys_gone_from_vault() {
    let t = Test::with_backend();
    t.write(".env.vault", "A=enc:1\n");
    t.write(".env", "A=1\nSTALE=x\n# end\n");

    assert_success(&t.decrypt_force(&["--no-backup"]));

    assert_eq!(t.read(".env"), "A=1\n# end\n");
}

#[test]
fn test_encrypt_then_decrypt_round_trip() {
    let t = Test::with_backend();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.encrypt_force(&[]));

    std::fs::remove_file(t.path(".env")).unwrap();
    assert_success(&t.decrypt_force(&[]));

    let restored = t.read(".env");
    for line in SAMPLE_ENV.lines().filter(|l| l.contains('=')) {
        assert!(restored.contains(line), "missing {} in {}", line, restored);
    }
}
