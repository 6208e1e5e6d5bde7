//! End-to-end tests for the `folio` binary.
//!
//! Each test gets its own data directory and a home directory with no
//! config, so nothing leaks between tests or from the developer's machine.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// An isolated environment for running folio.
struct Sandbox {
    home: TempDir,
    data: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            data: TempDir::new().unwrap(),
        }
    }

    /// Get a command for running folio inside the sandbox.
    fn folio(&self) -> Command {
        let mut cmd = Command::cargo_bin("folio").unwrap();
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("FOLIO_CONFIG", self.home.path().join("folio.toml"))
            .env_remove("FOLIO_DATA_DIR")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data.path());
        cmd
    }

    /// Create a document and return its token.
    fn new_doc(&self, args: &[&str]) -> String {
        let output = self
            .folio()
            .args(["-q", "new"])
            .args(args)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

#[test]
fn help_flag_works() {
    Sandbox::new()
        .folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("collaborative article"));
}

#[test]
fn new_prints_sequential_tokens() {
    let sandbox = Sandbox::new();
    assert_eq!(sandbox.new_doc(&[]), "1");
    assert_eq!(sandbox.new_doc(&["--title", "Second"]), "2");
}

#[test]
fn scopes_have_separate_tokens() {
    let sandbox = Sandbox::new();
    sandbox.new_doc(&[]);
    sandbox
        .folio()
        .args(["-q", "--scope", "other", "new"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn show_substitutes_placeholder_for_blank_title() {
    let sandbox = Sandbox::new();
    let token = sandbox.new_doc(&[]);

    sandbox
        .folio()
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:      Untitled"))
        .stdout(predicate::str::contains("Status:     draft"));

    // Storage keeps the blank title
    let documents = sandbox.data.child("documents.json");
    documents.assert(predicate::str::contains("\"title\": \"\""));
}

#[test]
fn show_by_old_url() {
    let sandbox = Sandbox::new();
    sandbox.new_doc(&["--title", "Imported", "--old-url", "/2019/05/hello"]);

    sandbox
        .folio()
        .args(["show", "--old-url", "/2019/05/hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported"));
}

#[test]
fn body_file_is_used() {
    let sandbox = Sandbox::new();
    let body = sandbox.home.child("body.md");
    body.write_str("# From a file\n").unwrap();

    let token = sandbox.new_doc(&["--body-file", body.path().to_str().unwrap()]);
    sandbox
        .folio()
        .args(["show", &token, "--body-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# From a file"));
}

#[test]
fn edit_snapshot_and_versions() {
    let sandbox = Sandbox::new();
    let token = sandbox.new_doc(&[]);

    sandbox
        .folio()
        .args(["edit", &token, "--title", "Draft one", "--editor", "u7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("save 1"));

    sandbox
        .folio()
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("unsaved changes"));

    sandbox
        .folio()
        .args(["snapshot", &token, "--editor", "u7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("editor:u7"));

    sandbox
        .folio()
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    sandbox
        .folio()
        .args(["edit", &token, "--body", "more", "--snapshot"])
        .assert()
        .success();

    let output = sandbox.folio().args(["versions", &token]).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("scope:default"));
    assert!(lines[1].contains("editor:u7"));
}

#[test]
fn edit_without_changes_fails() {
    let sandbox = Sandbox::new();
    let token = sandbox.new_doc(&[]);
    sandbox
        .folio()
        .args(["edit", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn lock_who_unlock() {
    let sandbox = Sandbox::new();
    let token = sandbox.new_doc(&[]);

    sandbox
        .folio()
        .args(["who", &token])
        .assert()
        .success()
        .stdout("unlocked\n");

    sandbox
        .folio()
        .args(["lock", &token, "--editor", "alice"])
        .assert()
        .success();
    sandbox
        .folio()
        .args(["lock", &token, "--editor", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was alice"));

    sandbox
        .folio()
        .args(["who", &token])
        .assert()
        .success()
        .stdout("bob\n");

    sandbox
        .folio()
        .args(["edit", &token, "--body", "x", "--editor", "alice"])
        .assert()
        .success()
        .stderr(predicate::str::contains("bob is currently editing"));

    sandbox
        .folio()
        .args(["unlock", &token, "--editor", "bob"])
        .assert()
        .success();
    sandbox
        .folio()
        .args(["who", &token])
        .assert()
        .success()
        .stdout("unlocked\n");
}

#[test]
fn status_and_listing() {
    let sandbox = Sandbox::new();
    let first = sandbox.new_doc(&["--title", "Keep"]);
    let second = sandbox.new_doc(&["--title", "Bin"]);

    sandbox
        .folio()
        .args(["status", &first, "publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("published at"));
    sandbox
        .folio()
        .args(["status", &first, "publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already publish"));
    sandbox
        .folio()
        .args(["status", &second, "trash"])
        .assert()
        .success();

    sandbox
        .folio()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep"))
        .stdout(predicate::str::contains("Bin").not());

    sandbox
        .folio()
        .args(["list", "--status", "trash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bin"))
        .stdout(predicate::str::contains("Keep").not());
}

#[test]
fn invalid_status_is_rejected() {
    let sandbox = Sandbox::new();
    let token = sandbox.new_doc(&[]);
    sandbox
        .folio()
        .args(["status", &token, "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn unknown_token_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .folio()
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no document with token 42"));
}

#[test]
fn malformed_token_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .folio()
        .args(["show", "007"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid token"));
}

#[test]
fn config_set_and_get() {
    let sandbox = Sandbox::new();

    sandbox
        .folio()
        .args(["config", "get", "lock.ttl_secs"])
        .assert()
        .success()
        .stdout("10\n");

    sandbox
        .folio()
        .args(["config", "set", "lock.ttl_secs", "30"])
        .assert()
        .success();
    sandbox.data.child("config.toml").assert(predicate::path::exists());

    sandbox
        .folio()
        .args(["config", "get", "lock.ttl_secs"])
        .assert()
        .success()
        .stdout("30\n");

    sandbox
        .folio()
        .args(["config", "set", "display.untitled", "Sans titre", "--global"])
        .assert()
        .success();
    sandbox.home.child("folio.toml").assert(predicate::path::exists());

    let token = sandbox.new_doc(&[]);
    sandbox
        .folio()
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sans titre"));
}

#[test]
fn config_rejects_bad_values() {
    let sandbox = Sandbox::new();
    sandbox
        .folio()
        .args(["config", "set", "lock.ttl_secs", "0"])
        .assert()
        .failure();
    sandbox
        .folio()
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn completion_generates_script() {
    Sandbox::new()
        .folio()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}
