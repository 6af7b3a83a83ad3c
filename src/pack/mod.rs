//! Input map document.
//!
//! A Fantasy Map Generator export is one JSON document whose `pack` object
//! carries the entity collections. Collections are kept as raw JSON so
//! that every record attribute can be passed through to the vault
//! unchanged; [`Record`] and [`CellTable`] provide lenient typed access.

mod cells;
mod record;

pub use cells::CellTable;
pub use record::{Record, as_float, as_int};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::entities::EntityKind;
use crate::error::InputError;

/// The parts of a map export the converter reads.
#[derive(Debug, Default, Deserialize)]
pub struct MapDocument {
    /// Entity collections.
    #[serde(default)]
    pub pack: Option<Pack>,
}

impl MapDocument {
    /// Reads and parses a map export.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Unreadable`] if the file cannot be opened and
    /// [`InputError::Parse`] if it is not valid JSON of the expected shape.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path).map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| InputError::Parse {
                path: path.to_path_buf(),
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), "map document parsed");
        Ok(document)
    }

    /// Extracts the pack.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingCollection`] when `pack` is absent or null.
    pub fn into_pack(self) -> Result<Pack, InputError> {
        self.pack
            .ok_or(InputError::MissingCollection { name: "pack" })
    }
}

/// Entity collections of a map. Any of them may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Pack {
    /// Column-wise cell data.
    pub cells: Option<Value>,
    /// Settlements.
    pub burgs: Option<Value>,
    /// States.
    pub states: Option<Value>,
    /// Provinces.
    pub provinces: Option<Value>,
    /// Cultures.
    pub cultures: Option<Value>,
    /// Religions.
    pub religions: Option<Value>,
    /// Terrain features.
    pub features: Option<Value>,
    /// Rivers.
    pub rivers: Option<Value>,
}

/// One slot of a record collection.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// A well-formed record.
    Record(Record<'a>),
    /// A null or non-object entry at this position.
    Invalid {
        /// Position within the collection.
        index: usize,
        /// The offending value.
        value: &'a Value,
    },
}

impl Pack {
    /// Builds a pack from a JSON value shaped like `{"cells": ..., "burgs": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Raw collection for `kind`, if present.
    #[must_use]
    pub const fn collection(&self, kind: EntityKind) -> Option<&Value> {
        let slot = match kind {
            EntityKind::Cell => &self.cells,
            EntityKind::Burg => &self.burgs,
            EntityKind::State => &self.states,
            EntityKind::Province => &self.provinces,
            EntityKind::Culture => &self.cultures,
            EntityKind::Religion => &self.religions,
            EntityKind::Feature => &self.features,
            EntityKind::River => &self.rivers,
        };
        slot.as_ref()
    }

    /// The collection for `kind` as a list, or `None` when it is missing
    /// or not a list. Cells are never a list.
    #[must_use]
    pub fn list(&self, kind: EntityKind) -> Option<&[Value]> {
        match self.collection(kind)? {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Record slots of `kind`, skipping the sentinel at index 0 where the
    /// kind uses one.
    pub fn slots(&self, kind: EntityKind) -> impl Iterator<Item = Slot<'_>> {
        let skip = usize::from(kind.has_sentinel());
        self.list(kind)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(index, value)| match value {
                Value::Object(map) => Slot::Record(Record::new(index, map)),
                other => Slot::Invalid {
                    index,
                    value: other,
                },
            })
    }

    /// Well-formed records of `kind`, skipping the sentinel and any
    /// invalid slots.
    pub fn records(&self, kind: EntityKind) -> impl Iterator<Item = Record<'_>> {
        self.slots(kind).filter_map(|slot| match slot {
            Slot::Record(record) => Some(record),
            Slot::Invalid { .. } => None,
        })
    }

    /// Column-wise cell table, if `cells` is an object.
    #[must_use]
    pub fn cell_table(&self) -> Option<CellTable<'_>> {
        match self.cells.as_ref()? {
            Value::Object(columns) => Some(CellTable::new(columns)),
            _ => None,
        }
    }
}
