//! Emblem (coat of arms) materialization.
//!
//! Each entity that carries an emblem gets one file in the vault's
//! `emblems/` folder named `{kind}-{id}.{ext}`. Inline SVG is written as
//! is, local files are copied, and remote URLs are fetched only when
//! downloads are enabled. The HTTP client is built on the first download,
//! so a run with downloads disabled never creates one.

pub mod source;

pub use source::{EmblemSource, extension_of};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::assets::digest_file;
use crate::config::EmblemOptions;
use crate::entities::EntityKind;
use crate::error::AssetError;
use crate::pack::Record;
use crate::vault::VaultLayout;

/// Emblem counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmblemStats {
    /// Files written, copied or downloaded.
    pub written: usize,
    /// Sources already present in the vault.
    pub reused: usize,
    /// Remote emblems skipped because downloads are disabled.
    pub skipped: usize,
    /// Sources that could not be materialized.
    pub failed: usize,
}

/// Resolves emblems into the vault.
#[derive(Debug)]
pub struct EmblemResolver {
    layout: VaultLayout,
    options: EmblemOptions,
    client: Option<reqwest::Client>,
    stats: EmblemStats,
}

impl EmblemResolver {
    /// Creates a resolver. No HTTP client is built here.
    #[must_use]
    pub fn new(layout: VaultLayout, options: EmblemOptions) -> Self {
        Self {
            layout,
            options,
            client: None,
            stats: EmblemStats::default(),
        }
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> EmblemStats {
        self.stats
    }

    /// Whether an HTTP client has been built during this run.
    #[must_use]
    pub const fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Materializes the emblem of `record` and returns its vault-relative
    /// path, or `None` when the record has no usable emblem.
    pub async fn resolve(&mut self, kind: EntityKind, id: i64, record: &Record<'_>) -> Option<String> {
        let source = EmblemSource::classify(record)?;
        let target = self
            .layout
            .emblem_dir()
            .join(format!("{}-{id}.{}", kind.slug(), source.extension()));

        let outcome = match &source {
            EmblemSource::Inline(svg) => write_file(&target, svg.as_bytes()).map(|()| true),
            EmblemSource::Local(path) => self.copy_local(path, &target),
            EmblemSource::Remote(url) => {
                if !self.options.download {
                    warn!(%kind, id, url, "emblem download disabled, skipping");
                    self.stats.skipped += 1;
                    return None;
                }
                self.download(url, &target).await.map(|()| true)
            }
        };

        match outcome {
            Ok(wrote) => {
                if wrote {
                    self.stats.written += 1;
                } else {
                    self.stats.reused += 1;
                }
                debug!(%kind, id, path = %target.display(), "emblem ready");
                self.layout.relative(&target)
            }
            Err(e) => {
                warn!(%kind, id, error = %e, "emblem skipped");
                self.stats.failed += 1;
                None
            }
        }
    }

    fn locate(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            if let Some(base) = &self.options.base_dir {
                let candidate = base.join(path);
                if candidate.is_file() {
                    return candidate;
                }
            }
        }
        path.to_path_buf()
    }

    /// Copies a local emblem. Returns `false` when nothing had to be written.
    fn copy_local(&self, path: &Path, target: &Path) -> Result<bool, AssetError> {
        let source = self.locate(path);
        let copy_error = |e| AssetError::Copy {
            path: source.clone(),
            source: e,
        };
        if !source.is_file() {
            return Err(copy_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "emblem file not found",
            )));
        }

        if target.is_file() {
            let same_file = match (fs::canonicalize(&source), fs::canonicalize(target)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            };
            if same_file {
                return Ok(false);
            }
            let digest = digest_file(&source).map_err(copy_error)?;
            if digest_file(target).is_ok_and(|d| d == digest) {
                return Ok(false);
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(copy_error)?;
        }
        fs::copy(&source, target).map_err(copy_error)?;
        Ok(true)
    }

    async fn download(&mut self, url: &str, target: &Path) -> Result<(), AssetError> {
        let download_error = |message: String| AssetError::Download {
            url: url.to_string(),
            message,
        };

        let client = match &self.client {
            Some(client) => client.clone(),
            None => {
                let client = reqwest::Client::builder()
                    .timeout(self.options.timeout)
                    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| download_error(e.to_string()))?;
                self.client = Some(client.clone());
                client
            }
        };

        debug!(url, "downloading emblem");
        let response = client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| download_error(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        write_file(target, &bytes).map_err(|e| download_error(e.to_string()))
    }
}

fn write_file(target: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let write_error = |e| AssetError::Copy {
        path: target.to_path_buf(),
        source: e,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(target, bytes).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn resolver(root: &Path, options: EmblemOptions) -> EmblemResolver {
        EmblemResolver::new(VaultLayout::new(root.join("World")), options)
    }

    #[tokio::test]
    async fn inline_svg_is_written_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let mut r = resolver(tmp.path(), EmblemOptions::default());
        let m = map(json!({"coa": {"svg": "<svg>crest</svg>"}}));

        let rel = r.resolve(EntityKind::State, 2, &Record::new(2, &m)).await;
        assert_eq!(rel.as_deref(), Some("emblems/state-2.svg"));
        let written = fs::read_to_string(tmp.path().join("World/emblems/state-2.svg")).unwrap();
        assert_eq!(written, "<svg>crest</svg>");
        assert_eq!(r.stats().written, 1);
    }

    #[tokio::test]
    async fn relative_local_path_resolves_against_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("maps/art")).unwrap();
        fs::write(tmp.path().join("maps/art/crest.jpg"), "jpg").unwrap();
        let options = EmblemOptions {
            base_dir: Some(tmp.path().join("maps")),
            ..EmblemOptions::default()
        };
        let mut r = resolver(tmp.path(), options);
        let m = map(json!({"emblem_url": "art/crest.jpg"}));

        let rel = r.resolve(EntityKind::Burg, 1, &Record::new(1, &m)).await;
        assert_eq!(rel.as_deref(), Some("emblems/burg-1.jpg"));
        assert!(tmp.path().join("World/emblems/burg-1.jpg").is_file());
    }

    #[tokio::test]
    async fn existing_identical_emblem_is_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("crest.png");
        fs::write(&source, "png").unwrap();
        fs::create_dir_all(tmp.path().join("World/emblems")).unwrap();
        fs::write(tmp.path().join("World/emblems/burg-1.png"), "png").unwrap();
        let mut r = resolver(tmp.path(), EmblemOptions::default());
        let m = map(json!({"emblem_url": source.to_string_lossy()}));

        let rel = r.resolve(EntityKind::Burg, 1, &Record::new(1, &m)).await;
        assert_eq!(rel.as_deref(), Some("emblems/burg-1.png"));
        assert_eq!(r.stats().reused, 1);
        assert_eq!(r.stats().written, 0);
    }

    #[tokio::test]
    async fn missing_local_file_is_a_soft_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut r = resolver(tmp.path(), EmblemOptions::default());
        let m = map(json!({"emblem_url": "/nonexistent/fmg_vault_crest.png"}));
        assert_eq!(r.resolve(EntityKind::Burg, 1, &Record::new(1, &m)).await, None);
        assert_eq!(r.stats().failed, 1);
    }

    #[tokio::test]
    async fn remote_without_downloads_builds_no_client() {
        let tmp = tempfile::tempdir().unwrap();
        let mut r = resolver(tmp.path(), EmblemOptions::default());
        let m = map(json!({"emblem_url": "https://example.invalid/coa.png"}));
        assert_eq!(r.resolve(EntityKind::Burg, 1, &Record::new(1, &m)).await, None);
        assert!(!r.has_client());
        assert_eq!(r.stats().skipped, 1);
    }
}
