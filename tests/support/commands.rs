//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Credential handed to the fake backend.
pub const TEST_CREDENTIAL: &str = "test-private-key";

impl Test {
    /// Create a dotseal command for this project.
    ///
    /// Returns a Command configured with:
    /// - Current directory set to the project directory
    /// - The test credential in `DOTENV_PRIVATE_KEY`
    /// - Colors disabled and logging at the default level
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("dotseal").expect("failed to find dotseal binary");
        cmd.current_dir(self.dir.path());
        cmd.env("DOTENV_PRIVATE_KEY", TEST_CREDENTIAL);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DOTSEAL_LOG");
        cmd
    }

    /// Run `dotseal <args>`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run dotseal")
    }

    /// Shortcut for `dotseal encrypt --force`.
    pub fn encrypt_force(&self, extra: &[&str]) -> Output {
        let mut args = vec!["encrypt", "--force"];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Shortcut for `dotseal decrypt --force`.
    pub fn decrypt_force(&self, extra: &[&str]) -> Output {
        let mut args = vec!["decrypt", "--force"];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Shortcut for `dotseal diff`.
    pub fn diff(&self, extra: &[&str]) -> Output {
        let mut args = vec!["diff"];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}
