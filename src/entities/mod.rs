//! Entity processors.
//!
//! One processor per [`EntityKind`], each turning the records of its
//! collection into vault documents. They share a [`Session`] that holds
//! everything a run writes through: the layout, the link index, the
//! emblem and asset resolvers, and the report.

pub mod burg;
pub mod cell;
pub mod culture;
pub mod feature;
pub mod kind;
pub mod province;
pub mod religion;
pub mod river;
pub mod state;

pub use kind::EntityKind;

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::assets::AssetResolver;
use crate::config::LoreOptions;
use crate::emblems::EmblemResolver;
use crate::error::Result;
use crate::observability::ConversionReport;
use crate::pack::{Pack, Record, Slot};
use crate::vault::{Frontmatter, FrontmatterFormat, LinkIndex, VaultLayout};

/// A rendered-to-be vault document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Kind of entity described.
    pub kind: EntityKind,
    /// File stem inside the kind's folder.
    pub stem: String,
    /// Header fields.
    pub frontmatter: Frontmatter,
    /// Markdown body.
    pub body: String,
}

/// Shared state of one conversion run.
#[derive(Debug)]
pub struct Session {
    /// Output vault.
    pub layout: VaultLayout,
    /// Cross-link targets.
    pub links: LinkIndex,
    /// Header rendering.
    pub format: FrontmatterFormat,
    /// Emblem materialization.
    pub emblems: EmblemResolver,
    /// MFCG assets, when enabled and the source directory exists.
    pub assets: Option<AssetResolver>,
    /// Generated lore, when enabled.
    pub lore: Option<LoreOptions>,
    /// Running report.
    pub report: ConversionReport,
}

impl Session {
    /// Renders and writes `document` to `{root}/{Folder}/{stem}.md`.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be rendered or the file cannot
    /// be written.
    pub fn write(&mut self, document: &Document) -> Result<PathBuf> {
        let text = document
            .frontmatter
            .render(&document.body, self.format)?;
        let path = self.layout.document_path(document.kind, &document.stem);
        std::fs::write(&path, text)?;
        debug!(kind = %document.kind, path = %path.display(), "document written");
        self.report.record_document(document.kind);
        Ok(path)
    }

    /// Well-formed records of `kind`. A missing collection and every
    /// invalid slot are logged and counted.
    pub fn records<'p>(&mut self, pack: &'p Pack, kind: EntityKind) -> Vec<Record<'p>> {
        if pack.list(kind).is_none() {
            warn!(collection = kind.collection(), "collection missing or not a list, skipping");
            self.report.record_missing(kind);
            return Vec::new();
        }
        pack.slots(kind)
            .filter_map(|slot| match slot {
                Slot::Record(record) => Some(record),
                Slot::Invalid { index, value } => {
                    warn!(
                        collection = kind.collection(),
                        index,
                        value = %value,
                        "skipping record that is not an object"
                    );
                    self.report.record_skipped();
                    None
                }
            })
            .collect()
    }

    /// `[[Folder/stem]]` for a reference, if it points at an entity.
    #[must_use]
    pub fn link(&self, kind: EntityKind, id: i64) -> Option<String> {
        self.links.link(kind, id)
    }

    /// Comma-separated links for a list of ids, or `None` when no id
    /// points at an entity.
    #[must_use]
    pub fn link_list(&self, kind: EntityKind, ids: &[i64]) -> Option<String> {
        let links = self.links.links(kind, ids);
        if links.is_empty() {
            None
        } else {
            Some(links.join(", "))
        }
    }
}

/// Heading `{Label} {name}`, or `{Label} {id}` for unnamed records.
#[must_use]
pub fn heading(kind: EntityKind, id: i64, name: &str) -> String {
    if name.trim().is_empty() {
        format!("{} {id}", kind.label())
    } else {
        format!("{} {name}", kind.label())
    }
}

/// Body text assembled line by line.
#[derive(Debug, Default)]
pub struct Body {
    lines: Vec<String>,
}

impl Body {
    /// Starts a body with a level-one heading.
    #[must_use]
    pub fn titled(title: impl std::fmt::Display) -> Self {
        Self {
            lines: vec![format!("# {title}")],
        }
    }

    /// Appends a line.
    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Appends the emblem embed when there is one.
    pub fn emblem(&mut self, emblem: Option<&str>) -> &mut Self {
        if let Some(path) = emblem {
            self.lines.push(format!("![[{path}]]"));
        }
        self
    }

    /// Appends `{label} → {target}` when the target exists.
    pub fn relation(&mut self, label: &str, target: Option<String>) -> &mut Self {
        if let Some(target) = target {
            self.lines.push(format!("{label} → {target}"));
        }
        self
    }

    /// Appends a blank line and a pre-formatted section.
    pub fn section(&mut self, section: &str) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(section.trim_end().to_string());
        self
    }

    /// The finished body.
    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

/// Runs the processor for `kind` and returns the number of documents
/// written.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(kind: EntityKind, session: &mut Session, pack: &Pack) -> Result<usize> {
    let before = session.report.documents_for(kind);
    match kind {
        EntityKind::Cell => cell::process(session, pack)?,
        EntityKind::Burg => burg::process(session, pack).await?,
        EntityKind::State => state::process(session, pack).await?,
        EntityKind::Province => province::process(session, pack).await?,
        EntityKind::Culture => culture::process(session, pack).await?,
        EntityKind::Religion => religion::process(session, pack).await?,
        EntityKind::Feature => feature::process(session, pack).await?,
        EntityKind::River => river::process(session, pack)?,
    }
    Ok(session.report.documents_for(kind) - before)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::EmblemOptions;
    use crate::error::LiteralError;
    use crate::vault::read_document;
    use serde_json::Value;

    /// A session writing into a fresh temporary vault.
    pub struct Harness {
        pub tmp: tempfile::TempDir,
        pub session: Session,
    }

    impl Harness {
        pub fn new(pack: &Pack) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let layout = VaultLayout::new(tmp.path().join("World"));
            layout.ensure().unwrap();
            let session = Session {
                links: LinkIndex::build(pack),
                format: FrontmatterFormat::Literal,
                emblems: EmblemResolver::new(layout.clone(), EmblemOptions::default()),
                assets: None,
                lore: None,
                report: ConversionReport::new(tmp.path(), layout.root()),
                layout,
            };
            Self { tmp, session }
        }

        /// Reads `{Folder}/{stem}.md` back into fields and body.
        pub fn read(
            &self,
            kind: EntityKind,
            stem: &str,
        ) -> std::result::Result<(Frontmatter, String), LiteralError> {
            let path = self.session.layout.document_path(kind, stem);
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
            read_document(&text, FrontmatterFormat::Literal)
        }

        /// Stems written for `kind`, sorted.
        pub fn stems(&self, kind: EntityKind) -> Vec<String> {
            let mut stems: Vec<String> = std::fs::read_dir(self.session.layout.kind_dir(kind))
                .unwrap()
                .filter_map(|e| {
                    let name = e.unwrap().file_name().to_string_lossy().into_owned();
                    name.strip_suffix(".md").map(str::to_string)
                })
                .collect();
            stems.sort();
            stems
        }
    }

    pub fn pack(value: Value) -> Pack {
        Pack::from_value(value).unwrap()
    }
}
