//! Tests for error handling and CLI flags.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypt"))
        .stdout(predicate::str::contains("decrypt"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.run(&["--version"]);
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();
    assert_failure(&t.run(&["unknown-command"]));
}

#[test]
fn test_backup_flags_conflict() {
    let t = Test::new();
    assert_failure(&t.run(&["encrypt", "--no-backup", "--require-backup"]));
}

#[test]
fn test_invalid_config() {
    let t = Test::new();
    t.config("[backend\n");
    t.write(".env", "A=1\n");

    t.cmd()
        .args(["encrypt", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn test_missing_credential_hint_names_configured_sources() {
    let t = Test::new();
    t.config("[credential]\nenv = \"APP_SEAL_KEY\"\nfile = \"secrets.keys\"\n");
    t.write(".env", "A=1\n");

    t.cmd()
        .args(["encrypt", "--force"])
        .env_remove("APP_SEAL_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide the private key through $APP_SEAL_KEY"))
        .stderr(predicate::str::contains("secrets.keys"))
        .stderr(predicate::str::contains("DOTENV_PRIVATE_KEY").not())
        .stderr(predicate::str::contains(".env.keys").not());
    assert!(!t.exists(".env.vault"));
}

#[cfg(unix)]
mod unix {
    use predicates::prelude::*;

    use crate::support::*;

    #[test]
    fn test_missing_credential() {
        let t = Test::with_backend();
        t.write(".env", "A=1\n");

        t.cmd()
            .args(["encrypt", "--force"])
            .env_remove("DOTENV_PRIVATE_KEY")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no private key found"))
            .stderr(predicate::str::contains(".env.keys"));
        assert!(!t.exists(".env.vault"));
    }

    #[test]
    fn test_credential_from_key_file() {
        let t = Test::with_backend();
        t.write(".env", "A=1\n");
        t.write(".env.keys", "# keys\nDOTENV_PRIVATE_KEY=from-file\n");

        let output = t
            .cmd()
            .args(["encrypt", "--force"])
            .env_remove("DOTENV_PRIVATE_KEY")
            .output()
            .unwrap();

        assert_success(&output);
        assert_eq!(t.read(".env.vault"), "A=enc:1\n");
    }

    #[test]
    fn test_missing_source() {
        let t = Test::with_backend();

        let output = t.encrypt_force(&[]);
        assert_failure(&output);
        assert_stderr_contains(&output, "source file not found");
        assert!(!t.exists(".env.vault"));
    }

    #[test]
    fn test_backend_failure_leaves_target_untouched() {
        let t = Test::new();
        t.install_backend(FAILING_BACKEND);
        t.write(".env", "A=2\n");
        t.write(".env.vault", "A=enc:1\n");
        let before = t.files();

        let output = t.encrypt_force(&[]);
        assert_failure(&output);

        assert_stderr_contains(&output, "backend exploded");
        assert_eq!(t.read(".env.vault"), "A=enc:1\n");
        assert_eq!(t.files(), before);
    }

    #[test]
    fn test_lossy_backend_is_rejected() {
        let t = Test::new();
        t.install_backend(LOSSY_BACKEND);
        t.write(".env", "A=1\n");

        let output = t.encrypt_force(&[]);
        assert_failure(&output);

        assert_stderr_contains(&output, "malformed backend output");
        assert!(!t.exists(".env.vault"));
    }

    #[test]
    fn test_backend_not_found() {
        let t = Test::new();
        t.config("[backend]\nprogram = \"dotseal-no-such-backend\"\nargs = [\"{file}\"]\n");
        t.write(".env", "A=1\n");

        t.cmd()
            .args(["encrypt", "--force"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("backend program not found"))
            .stderr(predicate::str::contains("[backend] program"));
    }
}
