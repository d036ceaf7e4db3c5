//! End-to-end tests for the `quickbackup` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Working directory with `docs/a.txt` = "hello" and `docs/sub/b.txt` = "world",
/// plus a settings file with cheap KDF parameters and a private temp dir
struct Fixture {
    work: TempDir,
    scratch: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();

        let docs = work.path().join("docs");
        fs::create_dir_all(docs.join("sub")).unwrap();
        fs::write(docs.join("a.txt"), "hello").unwrap();
        fs::write(docs.join("sub").join("b.txt"), "world").unwrap();

        let config = work.path().join("quickbackup.json");
        let settings = serde_json::json!({
            "kdf": { "memory_cost": 1024, "time_cost": 1, "parallelism": 1 },
            "temp_dir": scratch.path(),
        });
        fs::write(&config, settings.to_string()).unwrap();

        Self {
            work,
            scratch,
            config,
        }
    }

    fn path(&self) -> &Path {
        self.work.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quickbackup").unwrap();
        cmd.current_dir(self.path())
            .env("QUICKBACKUP_CONFIG", &self.config)
            .env_remove("RUST_LOG");
        cmd
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.scratch.path()).unwrap().count() == 0
    }
}

#[test]
fn backup_then_restore_round_trip() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "docs", "secret123", "--destination", "out.zip.enc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: out.zip.enc"))
        .stdout(predicate::str::contains("2 file(s)"));

    assert!(fx.path().join("out.zip.enc").exists());
    assert!(fx.scratch_is_empty());

    fx.cmd()
        .args(["restore", "out.zip.enc", "secret123", "restored"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"));

    let restored = fx.path().join("restored");
    assert_eq!(fs::read_to_string(restored.join("docs/a.txt")).unwrap(), "hello");
    assert_eq!(
        fs::read_to_string(restored.join("docs/sub/b.txt")).unwrap(),
        "world"
    );

    // Restore consumes the backup file
    assert!(!fx.path().join("out.zip.enc").exists());
    assert!(fx.scratch_is_empty());
}

#[test]
fn wrong_passphrase_fails_and_writes_nothing() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "docs", "secret123", "--destination", "out.zip.enc"])
        .assert()
        .success();

    let restored = fx.path().join("restored");
    fs::create_dir_all(&restored).unwrap();

    fx.cmd()
        .args(["restore", "out.zip.enc", "wrong", "restored"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Decryption failed: invalid passphrase or corrupted data",
        ));

    assert_eq!(fs::read_dir(&restored).unwrap().count(), 0);
    assert!(fx.path().join("out.zip.enc").exists());
    assert!(fx.scratch_is_empty());
}

#[test]
fn backup_uses_dated_default_name() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "docs", "secret123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup-"));

    let names: Vec<String> = fs::read_dir(fx.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("backup-") && n.ends_with(".zip.enc"))
        .collect();
    assert_eq!(names.len(), 1);
    // backup-YYYY-MM-DD.zip.enc
    assert_eq!(names[0].len(), "backup-2021-06-09.zip.enc".len());
}

#[test]
fn restore_defaults_to_backup_directory() {
    let fx = Fixture::new();
    let vault = fx.path().join("vault");
    fs::create_dir_all(&vault).unwrap();

    fx.cmd()
        .args(["backup", "docs", "secret123", "--destination", "vault/out.zip.enc"])
        .assert()
        .success();

    fx.cmd()
        .args(["restore", "vault/out.zip.enc", "secret123"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(vault.join("docs/a.txt")).unwrap(), "hello");
    assert!(!vault.join("out.zip.enc").exists());
}

#[test]
fn multiple_inputs_are_all_archived() {
    let fx = Fixture::new();
    fs::write(fx.path().join("notes.txt"), "top level").unwrap();

    fx.cmd()
        .args([
            "backup",
            "docs/sub",
            "notes.txt",
            "secret123",
            "--destination",
            "out.zip.enc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s)"));

    fx.cmd()
        .args(["restore", "out.zip.enc", "secret123", "restored"])
        .assert()
        .success();

    let restored = fx.path().join("restored");
    assert_eq!(
        fs::read_to_string(restored.join("docs/sub/b.txt")).unwrap(),
        "world"
    );
    assert_eq!(
        fs::read_to_string(restored.join("notes.txt")).unwrap(),
        "top level"
    );
    assert!(!restored.join("docs/a.txt").exists());
}

#[test]
fn missing_input_fails_without_output() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "nope", "secret123", "--destination", "out.zip.enc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found: nope"));

    assert!(!fx.path().join("out.zip.enc").exists());
    assert!(fx.scratch_is_empty());
}

#[test]
fn info_shows_header_without_passphrase() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "docs", "secret123", "--destination", "out.zip.enc"])
        .assert()
        .success();

    fx.cmd()
        .args(["info", "out.zip.enc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Argon2id + AES-256-GCM"))
        .stdout(predicate::str::contains("Payload: "))
        .stdout(predicate::str::contains("Memory Cost: 1024 KiB"));

    // Info never consumes the file
    assert!(fx.path().join("out.zip.enc").exists());
}

#[test]
fn info_rejects_non_backup_file() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["info", "docs/a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid backup"));
}

#[test]
fn backup_requires_passphrase() {
    let fx = Fixture::new();

    fx.cmd().args(["backup"]).assert().failure();
}

#[test]
fn explicit_missing_config_is_an_error() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["--config", "missing.json", "info", "docs/a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
