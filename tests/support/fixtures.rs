//! Test fixtures and constants.

/// Fake cipher backend.
///
/// Prefixes every value with `enc:` on encrypt and strips it on decrypt.
/// Encrypt output starts with a public key header, the way dotenvx does.
/// Fails when the credential variable is missing.
pub const FAKE_BACKEND: &str = r#"#!/bin/sh
[ -n "$DOTENV_PRIVATE_KEY" ] || { echo "no key" >&2; exit 2; }
case "$1" in
  encrypt)
    echo '#/--- public key ---/'
    echo 'DOTENV_PUBLIC_KEY="test-public-key"'
    sed -e '/^[A-Za-z_][A-Za-z0-9_]*=/ s/=/=enc:/' "$2"
    ;;
  decrypt)
    sed -e '/^[A-Za-z_][A-Za-z0-9_]*=/ s/=enc:/=/' "$2"
    ;;
  *)
    exit 64
    ;;
esac
"#;

/// Backend that always fails.
pub const FAILING_BACKEND: &str = r#"#!/bin/sh
echo "backend exploded" >&2
exit 1
"#;

/// Backend that drops every key it is given.
pub const LOSSY_BACKEND: &str = r##"#!/bin/sh
echo "# nothing here"
"##;

/// Plaintext used across tests.
pub const SAMPLE_ENV: &str = "# database\nDATABASE_URL=postgres://localhost/app\n\nAPI_KEY=sk-test-1\nDEBUG=true\n";

/// Encrypted form of [`SAMPLE_ENV`] as the fake backend writes it.
pub const SAMPLE_VAULT: &str = "# database\nDATABASE_URL=enc:postgres://localhost/app\n\nAPI_KEY=enc:sk-test-1\nDEBUG=enc:true\n";
