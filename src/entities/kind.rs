//! Entity kinds and their naming rules.

use std::fmt;

use serde::Serialize;

use crate::vault::sanitize::sanitize_name;

/// The eight entity collections of a map pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Voronoi cell (stored column-wise, 0-indexed).
    Cell,
    /// Settlement.
    Burg,
    /// Political state.
    State,
    /// State subdivision.
    Province,
    /// Culture.
    Culture,
    /// Religion.
    Religion,
    /// Terrain feature (ocean, island, lake).
    Feature,
    /// River.
    River,
}

impl EntityKind {
    /// All kinds in processing order.
    pub const ALL: [Self; 8] = [
        Self::Cell,
        Self::Burg,
        Self::State,
        Self::Province,
        Self::Culture,
        Self::Religion,
        Self::Feature,
        Self::River,
    ];

    /// Capitalised prefix used in document filenames (`Burg-3-...`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cell => "Cell",
            Self::Burg => "Burg",
            Self::State => "State",
            Self::Province => "Province",
            Self::Culture => "Culture",
            Self::Religion => "Religion",
            Self::Feature => "Feature",
            Self::River => "River",
        }
    }

    /// Vault folder holding this kind's documents.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Cell => "Cells",
            Self::Burg => "Burgs",
            Self::State => "States",
            Self::Province => "Provinces",
            Self::Culture => "Cultures",
            Self::Religion => "Religions",
            Self::Feature => "Features",
            Self::River => "Rivers",
        }
    }

    /// Lower-case slug used in emblem filenames and asset matching.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Burg => "burg",
            Self::State => "state",
            Self::Province => "province",
            Self::Culture => "culture",
            Self::Religion => "religion",
            Self::Feature => "feature",
            Self::River => "river",
        }
    }

    /// Key of the collection inside `pack`.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Cell => "cells",
            Self::Burg => "burgs",
            Self::State => "states",
            Self::Province => "provinces",
            Self::Culture => "cultures",
            Self::Religion => "religions",
            Self::Feature => "features",
            Self::River => "rivers",
        }
    }

    /// Whether element 0 of the collection is a placeholder to skip.
    #[must_use]
    pub const fn has_sentinel(self) -> bool {
        !matches!(self, Self::Cell | Self::River)
    }

    /// Whether records of this kind may carry an emblem.
    #[must_use]
    pub const fn has_emblem(self) -> bool {
        !matches!(self, Self::Cell | Self::River)
    }

    /// Record field used as the display name.
    #[must_use]
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Feature => "type",
            _ => "name",
        }
    }

    /// Whether id 0 refers to "no entity" when used as a reference.
    #[must_use]
    pub const fn zero_is_none(self) -> bool {
        !matches!(self, Self::Cell)
    }

    /// Document stem: `{Label}-{id}` plus `-{sanitized name}` when the
    /// name sanitizes to something non-empty.
    #[must_use]
    pub fn stem(self, id: i64, name: &str) -> String {
        let safe = sanitize_name(name);
        if safe.is_empty() {
            format!("{}-{id}", self.label())
        } else {
            format!("{}-{id}-{safe}", self.label())
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_includes_sanitized_name() {
        assert_eq!(EntityKind::Burg.stem(1, "Stonehaven"), "Burg-1-Stonehaven");
        assert_eq!(EntityKind::Burg.stem(4, "Nested Town"), "Burg-4-Nested_Town");
    }

    #[test]
    fn stem_omits_empty_name() {
        assert_eq!(EntityKind::Cell.stem(0, ""), "Cell-0");
        assert_eq!(EntityKind::State.stem(9, "!!"), "State-9");
    }

    #[test]
    fn sentinel_kinds() {
        let skipped: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| k.has_sentinel())
            .collect();
        assert_eq!(
            skipped,
            vec![
                EntityKind::Burg,
                EntityKind::State,
                EntityKind::Province,
                EntityKind::Culture,
                EntityKind::Religion,
                EntityKind::Feature,
            ]
        );
    }

    #[test]
    fn features_are_named_by_type() {
        assert_eq!(EntityKind::Feature.name_field(), "type");
        assert_eq!(EntityKind::River.name_field(), "name");
    }

    #[test]
    fn folders_are_distinct() {
        let mut folders: Vec<_> = EntityKind::ALL.iter().map(|k| k.folder()).collect();
        folders.sort_unstable();
        folders.dedup();
        assert_eq!(folders.len(), 8);
    }
}
