//! MFCG asset resolution.
//!
//! Finds the exports belonging to a settlement in the MFCG source
//! directory, copies them under `{Folder}/{stem}/mfcg/`, and returns the
//! vault-relative paths to reference from the settlement's document.
//! Optional content-hash dedupe avoids storing the same bytes twice, and
//! optional archive mode bundles each settlement's assets into one zip.
//!
//! Every failure here is recoverable: it is logged, counted, and the
//! remaining candidates are still processed.

pub mod archive;
pub mod matcher;
pub mod store;

pub use matcher::{Candidate, Matcher, Target};
pub use store::{ContentStore, digest_file};

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::MfcgOptions;
use crate::error::{AssetError, ConfigError};
use crate::vault::VaultLayout;

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetStats {
    /// References handed back to documents.
    pub linked: usize,
    /// References satisfied by an already stored copy.
    pub reused: usize,
    /// Archives written.
    pub archives: usize,
    /// Files or archives that failed.
    pub failures: usize,
}

/// How one source file ended up in the vault.
enum Placement {
    Copied(String),
    Reused(String),
}

/// Resolves MFCG assets for the entities of one run.
#[derive(Debug)]
pub struct AssetResolver {
    layout: VaultLayout,
    matcher: Matcher,
    listing: Vec<Candidate>,
    dedupe: bool,
    archive: bool,
    store: ContentStore,
    stats: AssetStats,
}

impl AssetResolver {
    /// Prepares asset resolution for a run.
    ///
    /// Returns `Ok(None)` (after one warning) when the source directory is
    /// missing; resolution stays disabled for the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid pattern or map-file.
    pub fn new(options: &MfcgOptions, layout: VaultLayout) -> Result<Option<Self>, ConfigError> {
        let matcher = Matcher::from_options(options)?;

        if !options.source_dir.is_dir() {
            warn!(
                path = %options.source_dir.display(),
                "MFCG directory not found, asset resolution disabled"
            );
            return Ok(None);
        }

        let listing = if matcher.scans_directory() {
            list_children(&options.source_dir)
        } else {
            Vec::new()
        };
        info!(
            path = %options.source_dir.display(),
            strategy = options.strategy.as_str(),
            candidates = listing.len(),
            dedupe = options.dedupe,
            archive = options.archive,
            "MFCG asset resolution enabled"
        );

        Ok(Some(Self {
            layout,
            matcher,
            listing,
            dedupe: options.dedupe,
            archive: options.archive,
            store: ContentStore::default(),
            stats: AssetStats::default(),
        }))
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> AssetStats {
        self.stats
    }

    /// Copies every asset matching `target` and returns their vault-relative
    /// paths in order. In archive mode the archive path is the only entry.
    pub fn resolve(&mut self, target: Target<'_>) -> Vec<String> {
        let sources = self.matcher.select(target, &self.listing);
        if sources.is_empty() {
            return Vec::new();
        }

        let stem = target.kind.stem(target.id, target.name);
        let dest_dir = self.layout.asset_dir(target.kind, &stem);

        // Cross-entity reuse would point into folders that archive mode
        // deletes, so the store is per entity there.
        let mut entity_store = ContentStore::default();
        let store = if self.archive {
            &mut entity_store
        } else {
            &mut self.store
        };
        let mut copier = Copier {
            layout: &self.layout,
            store,
            dedupe: self.dedupe,
            stats: &mut self.stats,
            refs: Vec::new(),
        };

        for source in &sources {
            copier.place_source(source, &dest_dir);
        }
        let refs = copier.refs;

        if !self.archive || refs.is_empty() || !dest_dir.is_dir() {
            self.stats.linked += refs.len();
            return refs;
        }

        let archive_path = dest_dir.join(format!("{stem}-mfcg.zip"));
        match archive::bundle(&dest_dir, &archive_path) {
            Ok(count) => {
                if let Err(e) = archive::remove_loose(&dest_dir, &archive_path) {
                    warn!(path = %dest_dir.display(), error = %e, "cannot remove archived files");
                }
                debug!(path = %archive_path.display(), entries = count, "archive written");
                self.stats.archives += 1;
                self.stats.linked += 1;
                self.layout
                    .relative(&archive_path)
                    .map_or_else(Vec::new, |rel| vec![rel])
            }
            Err(e) => {
                warn!(error = %e, "archive failed, keeping loose files");
                self.stats.failures += 1;
                self.stats.linked += refs.len();
                refs
            }
        }
    }
}

/// Sorted direct children of `dir`; unreadable entries are skipped.
fn list_children(dir: &Path) -> Vec<Candidate> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "cannot list MFCG directory");
            return Vec::new();
        }
    };
    let mut listing: Vec<Candidate> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(Candidate {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.path().is_dir(),
                path: entry.path(),
            }),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    listing
}

struct Copier<'a> {
    layout: &'a VaultLayout,
    store: &'a mut ContentStore,
    dedupe: bool,
    stats: &'a mut AssetStats,
    refs: Vec<String>,
}

impl Copier<'_> {
    fn place_source(&mut self, source: &Path, dest_dir: &Path) {
        let Some(top) = source.file_name() else {
            warn!(path = %source.display(), "asset path has no file name");
            self.stats.failures += 1;
            return;
        };
        let top_dest = dest_dir.join(top);

        if source.is_dir() {
            for entry in WalkDir::new(source).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(path = %source.display(), error = %e, "skipping unreadable asset");
                        self.stats.failures += 1;
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(source) else {
                    continue;
                };
                self.place_file(entry.path(), &top_dest.join(rel));
            }
        } else if source.is_file() {
            self.place_file(source, &top_dest);
        } else {
            warn!(path = %source.display(), "asset not found");
            self.stats.failures += 1;
        }
    }

    fn place_file(&mut self, source: &Path, target: &Path) {
        match self.place(source, target) {
            Ok(Placement::Copied(rel)) => {
                debug!(from = %source.display(), to = %rel, "asset copied");
                self.refs.push(rel);
            }
            Ok(Placement::Reused(rel)) => {
                debug!(from = %source.display(), to = %rel, "asset reused");
                self.stats.reused += 1;
                self.refs.push(rel);
            }
            Err(e) => {
                warn!(error = %e, "skipping asset");
                self.stats.failures += 1;
            }
        }
    }

    fn place(&mut self, source: &Path, target: &Path) -> Result<Placement, AssetError> {
        let copy_error = |source_err| AssetError::Copy {
            path: source.to_path_buf(),
            source: source_err,
        };
        let rel = self
            .layout
            .relative(target)
            .unwrap_or_else(|| target.display().to_string());

        if !self.dedupe {
            copy_into(source, target).map_err(copy_error)?;
            return Ok(Placement::Copied(rel));
        }

        let digest = digest_file(source).map_err(copy_error)?;
        if let Some(existing) = self.store.get(&digest) {
            return Ok(Placement::Reused(existing.to_string()));
        }
        let identical = target.is_file() && digest_file(target).is_ok_and(|d| d == digest);
        if !identical {
            copy_into(source, target).map_err(copy_error)?;
        }
        self.store.insert(digest, rel.clone());
        Ok(Placement::Copied(rel))
    }
}

fn copy_into(source: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchStrategy;
    use crate::entities::EntityKind;
    use std::path::PathBuf;

    fn burg(id: i64, name: &str) -> Target<'_> {
        Target {
            kind: EntityKind::Burg,
            id,
            name,
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        source: PathBuf,
        vault: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("mfcg_src");
        let vault = tmp.path().join("World");
        fs::create_dir_all(&source).unwrap();
        Fixture {
            source,
            vault,
            _tmp: tmp,
        }
    }

    fn resolver(fx: &Fixture, options: MfcgOptions) -> AssetResolver {
        AssetResolver::new(&options, VaultLayout::new(&fx.vault))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn missing_source_disables_resolution() {
        let fx = fixture();
        let options = MfcgOptions::new(fx.source.join("nope"));
        let resolver = AssetResolver::new(&options, VaultLayout::new(&fx.vault)).unwrap();
        assert!(resolver.is_none());
    }

    #[test]
    fn config_errors_win_over_missing_directory() {
        let fx = fixture();
        let options = MfcgOptions {
            strategy: MatchStrategy::Regex,
            pattern: Some("(".into()),
            ..MfcgOptions::new(fx.source.join("nope"))
        };
        assert!(AssetResolver::new(&options, VaultLayout::new(&fx.vault)).is_err());
    }

    #[test]
    fn copies_matching_file() {
        let fx = fixture();
        fs::write(fx.source.join("burg-2.png"), "img").unwrap();
        let mut r = resolver(&fx, MfcgOptions::new(&fx.source));

        let refs = r.resolve(burg(2, "Testburg"));
        assert_eq!(refs, ["Burgs/Burg-2-Testburg/mfcg/burg-2.png"]);
        assert!(fx.vault.join("Burgs/Burg-2-Testburg/mfcg/burg-2.png").is_file());
        assert_eq!(r.stats().linked, 1);
    }

    #[test]
    fn no_match_returns_nothing() {
        let fx = fixture();
        fs::write(fx.source.join("other.png"), "img").unwrap();
        let mut r = resolver(&fx, MfcgOptions::new(&fx.source));
        assert!(r.resolve(burg(9, "Nowhere")).is_empty());
        assert!(!fx.vault.join("Burgs").exists());
    }

    #[test]
    fn dedupe_reuses_stored_copy() {
        let fx = fixture();
        fs::write(fx.source.join("shared.png"), "same bytes").unwrap();
        fs::write(fx.source.join("map.yaml"), "1: shared.png\n2: shared.png\n").unwrap();
        let options = MfcgOptions {
            strategy: MatchStrategy::Map,
            map_file: Some(fx.source.join("map.yaml")),
            dedupe: true,
            ..MfcgOptions::new(&fx.source)
        };
        let mut r = resolver(&fx, options);

        let first = r.resolve(burg(1, "Ash"));
        let second = r.resolve(burg(2, "Birch"));
        assert_eq!(first, ["Burgs/Burg-1-Ash/mfcg/shared.png"]);
        assert_eq!(second, first);
        assert!(!fx.vault.join("Burgs/Burg-2-Birch").exists());
        assert_eq!(r.stats().reused, 1);
    }

    #[test]
    fn archive_leaves_single_zip() {
        let fx = fixture();
        fs::create_dir_all(fx.source.join("Burg-3-Oak/layers")).unwrap();
        fs::write(fx.source.join("Burg-3-Oak/layers/a.svg"), "a").unwrap();
        fs::write(fx.source.join("burg-3.png"), "b").unwrap();
        let options = MfcgOptions {
            archive: true,
            ..MfcgOptions::new(&fx.source)
        };
        let mut r = resolver(&fx, options);

        let refs = r.resolve(burg(3, "Oak"));
        assert_eq!(refs, ["Burgs/Burg-3-Oak/mfcg/Burg-3-Oak-mfcg.zip"]);
        let left: Vec<_> = fs::read_dir(fx.vault.join("Burgs/Burg-3-Oak/mfcg"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(left, ["Burg-3-Oak-mfcg.zip"]);
        assert_eq!(r.stats().archives, 1);
    }

    #[test]
    fn missing_map_target_is_skipped() {
        let fx = fixture();
        fs::write(fx.source.join("ok.png"), "ok").unwrap();
        fs::write(fx.source.join("map.yaml"), "1: [gone.png, ok.png]\n").unwrap();
        let options = MfcgOptions {
            strategy: MatchStrategy::Map,
            map_file: Some(fx.source.join("map.yaml")),
            ..MfcgOptions::new(&fx.source)
        };
        let mut r = resolver(&fx, options);
        assert_eq!(r.resolve(burg(1, "")), ["Burgs/Burg-1/mfcg/ok.png"]);
        assert_eq!(r.stats().failures, 1);
    }
}
