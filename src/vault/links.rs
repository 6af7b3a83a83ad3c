//! Wiki-link targets for cross-references between documents.

use std::collections::HashMap;

use crate::entities::EntityKind;
use crate::pack::Pack;

/// Maps `(kind, id)` to the stem of the document written for it, so a
/// reference like `state: 3` can link to `[[States/State-3-Avaria]]`.
#[derive(Debug, Default, Clone)]
pub struct LinkIndex {
    stems: HashMap<(EntityKind, i64), String>,
}

impl LinkIndex {
    /// Indexes every named record of `pack` using the same stem rule the
    /// processors use for filenames.
    #[must_use]
    pub fn build(pack: &Pack) -> Self {
        let mut index = Self::default();
        for kind in EntityKind::ALL {
            if kind == EntityKind::Cell {
                continue;
            }
            for record in pack.records(kind) {
                let id = record.id();
                index.insert(kind, id, kind.stem(id, &record.name(kind)));
            }
        }
        index
    }

    /// Registers a stem.
    pub fn insert(&mut self, kind: EntityKind, id: i64, stem: String) {
        self.stems.insert((kind, id), stem);
    }

    /// Stem for `(kind, id)`. Cells are never indexed; their stem is
    /// always `Cell-{id}`.
    #[must_use]
    pub fn stem(&self, kind: EntityKind, id: i64) -> String {
        self.stems
            .get(&(kind, id))
            .cloned()
            .unwrap_or_else(|| format!("{}-{id}", kind.label()))
    }

    /// `[[Folder/stem]]` for a reference, or `None` when the id means
    /// "no entity" for that kind.
    #[must_use]
    pub fn link(&self, kind: EntityKind, id: i64) -> Option<String> {
        if id < 0 || (id == 0 && kind.zero_is_none()) {
            return None;
        }
        Some(format!("[[{}/{}]]", kind.folder(), self.stem(kind, id)))
    }

    /// Links for every id in `ids`, dropping "no entity" references.
    #[must_use]
    pub fn links(&self, kind: EntityKind, ids: &[i64]) -> Vec<String> {
        ids.iter().filter_map(|&id| self.link(kind, id)).collect()
    }

    /// Number of indexed stems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    /// Whether nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}
