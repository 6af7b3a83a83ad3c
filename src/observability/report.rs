//! End-of-run summaries.
//!
//! [`ConversionReport`] is filled in while a vault is written and printed
//! when the run ends, either as one line of prose or as JSON.
//! [`Inventory`] is the read-only counterpart used by `inspect`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assets::AssetStats;
use crate::emblems::EmblemStats;
use crate::entities::EntityKind;
use crate::pack::{Pack, Slot};

// ============================================================================
// Conversion Report
// ============================================================================

/// Outcome of one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Input map export.
    pub map_file: PathBuf,
    /// Vault root.
    pub output_dir: PathBuf,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Documents written per kind.
    pub documents: BTreeMap<EntityKind, usize>,
    /// Records skipped because they were null or not objects.
    pub skipped: usize,
    /// Collections that were missing or not lists.
    pub missing_collections: Vec<&'static str>,
    /// Emblem counters.
    pub emblems: EmblemStats,
    /// MFCG counters, when asset integration ran.
    pub assets: Option<AssetStats>,
}

impl ConversionReport {
    /// Starts a report now.
    #[must_use]
    pub fn new(map_file: &Path, output_dir: &Path) -> Self {
        Self {
            map_file: map_file.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            started_at: Utc::now(),
            finished_at: None,
            documents: BTreeMap::new(),
            skipped: 0,
            missing_collections: Vec::new(),
            emblems: EmblemStats::default(),
            assets: None,
        }
    }

    /// Counts one written document.
    pub fn record_document(&mut self, kind: EntityKind) {
        *self.documents.entry(kind).or_insert(0) += 1;
    }

    /// Counts one skipped record.
    pub const fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Notes a collection that could not be processed.
    pub fn record_missing(&mut self, kind: EntityKind) {
        self.missing_collections.push(kind.collection());
    }

    /// Documents written for `kind`.
    #[must_use]
    pub fn documents_for(&self, kind: EntityKind) -> usize {
        self.documents.get(&kind).copied().unwrap_or(0)
    }

    /// Documents written in total.
    #[must_use]
    pub fn total_documents(&self) -> usize {
        self.documents.values().sum()
    }

    /// Stamps the finish time and attaches resolver counters.
    pub fn finish(&mut self, emblems: EmblemStats, assets: Option<AssetStats>) {
        self.emblems = emblems;
        self.assets = assets;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, once finished.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let per_kind: Vec<String> = EntityKind::ALL
            .into_iter()
            .map(|kind| format!("{} {}", kind.collection(), self.documents_for(kind)))
            .collect();
        let mut line = format!(
            "Wrote {} documents to {} ({}), {} skipped; emblems {} written, {} reused, {} skipped, {} failed",
            self.total_documents(),
            self.output_dir.display(),
            per_kind.join(", "),
            self.skipped,
            self.emblems.written,
            self.emblems.reused,
            self.emblems.skipped,
            self.emblems.failed,
        );
        if let Some(assets) = &self.assets {
            let _ = write!(
                line,
                "; MFCG {} linked, {} reused, {} archives, {} failed",
                assets.linked, assets.reused, assets.archives, assets.failures
            );
        }
        line
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Entity counts of one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCount {
    /// Whether the collection exists in a usable shape.
    pub present: bool,
    /// Documents a conversion would write.
    pub documents: usize,
    /// Null or non-object entries.
    pub invalid: usize,
}

/// What a map contains, without writing anything.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    /// Input map export.
    pub map_file: PathBuf,
    /// Counts per kind.
    pub kinds: BTreeMap<EntityKind, KindCount>,
}

impl Inventory {
    /// Counts the entities of `pack`.
    #[must_use]
    pub fn from_pack(map_file: &Path, pack: &Pack) -> Self {
        let mut kinds = BTreeMap::new();
        for kind in EntityKind::ALL {
            let count = if kind == EntityKind::Cell {
                pack.cell_table().map_or_else(KindCount::default, |table| KindCount {
                    present: true,
                    documents: table.len(),
                    invalid: 0,
                })
            } else {
                let mut count = KindCount {
                    present: pack.list(kind).is_some(),
                    ..KindCount::default()
                };
                for slot in pack.slots(kind) {
                    match slot {
                        Slot::Record(_) => count.documents += 1,
                        Slot::Invalid { .. } => count.invalid += 1,
                    }
                }
                count
            };
            kinds.insert(kind, count);
        }
        Self {
            map_file: map_file.to_path_buf(),
            kinds,
        }
    }

    /// Documents a conversion would write in total.
    #[must_use]
    pub fn total(&self) -> usize {
        self.kinds.values().map(|c| c.documents).sum()
    }

    /// Multi-line human rendering.
    #[must_use]
    pub fn render_human(&self) -> String {
        let mut out = format!("{}\n", self.map_file.display());
        for (kind, count) in &self.kinds {
            if count.present {
                let _ = write!(out, "  {:<10} {:>8}", kind.collection(), count.documents);
                if count.invalid > 0 {
                    let _ = write!(out, "  ({} invalid)", count.invalid);
                }
                out.push('\n');
            } else {
                let _ = writeln!(out, "  {:<10} {:>8}", kind.collection(), "missing");
            }
        }
        let _ = writeln!(out, "  {:<10} {:>8}", "total", self.total());
        out
    }
}
