//! Column-wise cell data.

use serde_json::{Map, Value};

use super::record::{as_float, as_int};

/// View over `pack.cells`, an object of parallel per-cell arrays
/// (`h`, `x`, `y`, `f`, `biome`, ...). The number of cells is the length
/// of the height column `h`.
#[derive(Debug, Clone, Copy)]
pub struct CellTable<'a> {
    columns: &'a Map<String, Value>,
}

impl<'a> CellTable<'a> {
    /// Wraps the cell object.
    #[must_use]
    pub const fn new(columns: &'a Map<String, Value>) -> Self {
        Self { columns }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.column("h").map_or(0, <[Value]>::len)
    }

    /// Whether the table has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn column(&self, key: &str) -> Option<&'a [Value]> {
        match self.columns.get(key)? {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Raw value of `key` for cell `index`. Columns may also be objects
    /// keyed by the cell id.
    #[must_use]
    pub fn value(&self, key: &str, index: usize) -> Option<&'a Value> {
        match self.columns.get(key)? {
            Value::Array(items) => items.get(index),
            Value::Object(by_id) => by_id.get(&index.to_string()),
            _ => None,
        }
    }

    /// Integer value of `key` for cell `index`, 0 when missing.
    #[must_use]
    pub fn int(&self, key: &str, index: usize) -> i64 {
        self.value(key, index).and_then(as_int).unwrap_or(0)
    }

    /// Float value of `key` for cell `index`, 0.0 when missing.
    #[must_use]
    pub fn float(&self, key: &str, index: usize) -> f64 {
        self.value(key, index).and_then(as_float).unwrap_or(0.0)
    }
}
