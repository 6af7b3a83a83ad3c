//! Shared integration-test harness: runs the built `fmg-vault` binary
//! against map exports written into temporary directories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use fmg_vault::vault::{Frontmatter, FrontmatterFormat, read_document};
use serde_json::{Value, json};

/// Runs `fmg-vault` with the given arguments and waits for it to exit.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmg-vault"))
        .args(args)
        .env_remove("FMG_VAULT_OUTDIR")
        .env_remove("FMG_VAULT_MFCG_DIR")
        .env_remove("FMG_VAULT_DOWNLOAD_EMBLEMS")
        .env_remove("FMG_VAULT_LOG_LEVEL")
        .output()
        .expect("failed to run fmg-vault")
}

/// A temporary workspace holding a map export and the vault written from it.
pub struct Workspace {
    pub tmp: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Writes `{"pack": pack}` to `map.json` and returns its path.
    pub fn write_map(&self, pack: Value) -> PathBuf {
        self.write_document(&json!({ "pack": pack }))
    }

    /// Writes an arbitrary document to `map.json`.
    pub fn write_document(&self, document: &Value) -> PathBuf {
        let path = self.path().join("map.json");
        std::fs::write(&path, document.to_string()).expect("write map");
        path
    }

    /// Writes `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Default vault root used by the tests.
    pub fn vault(&self) -> PathBuf {
        self.path().join("World")
    }

    /// Runs `convert` on `map.json` into [`Self::vault`] with extra args.
    pub fn convert(&self, extra: &[&str]) -> Output {
        let map = self.path().join("map.json");
        let vault = self.vault();
        let mut args = vec![
            "--quiet",
            "convert",
            map.to_str().expect("utf-8 path"),
            "--outdir",
            vault.to_str().expect("utf-8 path"),
        ];
        args.extend_from_slice(extra);
        spawn_command(&args)
    }

    /// Parses `{vault}/{rel}` as a literal-header document.
    pub fn read_doc(&self, rel: &str) -> (Frontmatter, String) {
        let path = self.vault().join(rel);
        let text = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        read_document(&text, FrontmatterFormat::Literal).expect("valid document")
    }

    /// Sorted file names in `{vault}/{folder}`.
    pub fn list(&self, folder: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.vault().join(folder))
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "fmg-vault failed ({:?}): {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}
