//! Lenient access to a single entity record.

use serde_json::{Map, Value};

use crate::entities::EntityKind;

/// Casts a JSON value to an integer the forgiving way: floats truncate,
/// booleans become 0/1, numeric strings parse.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Casts a JSON value to a float: numbers, booleans and numeric strings.
#[must_use]
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One entity record together with its position in the collection.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: usize,
    map: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wraps the record found at `index`.
    #[must_use]
    pub const fn new(index: usize, map: &'a Map<String, Value>) -> Self {
        Self { index, map }
    }

    /// Position of the record in its collection.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Entity id: the record's `i` field, falling back to its position.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.map
            .get("i")
            .and_then(as_int)
            .unwrap_or_else(|| i64::try_from(self.index).unwrap_or(i64::MAX))
    }

    /// Display name according to the kind's naming field.
    #[must_use]
    pub fn name(&self, kind: EntityKind) -> String {
        self.text(kind.name_field())
    }

    /// Raw attribute value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Attribute passed through verbatim, or `default` when absent.
    #[must_use]
    pub fn field_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.map.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// Attribute as an integer, 0 when absent or not numeric.
    #[must_use]
    pub fn int(&self, key: &str) -> i64 {
        self.map.get(key).and_then(as_int).unwrap_or(0)
    }

    /// Attribute as text; numbers are stringified, anything else is empty.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.map.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Attribute as a list of ids; non-numeric members are dropped.
    #[must_use]
    pub fn ids(&self, key: &str) -> Vec<i64> {
        match self.map.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(as_int).collect(),
            _ => Vec::new(),
        }
    }
}
