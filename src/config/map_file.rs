//! Explicit entity → asset map-file.
//!
//! A YAML (or JSON) mapping whose keys are entity ids or names and whose
//! values are one path or a list of paths:
//!
//! ```yaml
//! 3: exports/harbor.png
//! Stonehaven:
//!   - exports/stonehaven
//!   - exports/stonehaven.svg
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::vault::sanitize_name;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Targets {
    One(String),
    Many(Vec<String>),
}

impl Targets {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(path) => vec![path],
            Self::Many(paths) => paths,
        }
    }
}

/// Parsed map-file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMap {
    entries: IndexMap<String, Vec<String>>,
}

impl AssetMap {
    /// Loads a map-file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MapFile`] if the file cannot be read, is not a
    /// mapping, or has keys that are neither strings nor numbers.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let map_err = |message: String| ConfigError::MapFile {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| map_err(e.to_string()))?;
        Self::parse(&text).map_err(map_err)
    }

    /// Parses map-file text.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the text is not a valid map.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: IndexMap<serde_yaml::Value, Targets> =
            serde_yaml::from_str(text).map_err(|e| e.to_string())?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for (key, targets) in raw {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                other => return Err(format!("unsupported key {other:?}")),
            };
            entries.insert(key, targets.into_vec());
        }
        Ok(Self { entries })
    }

    /// Paths mapped to an entity: by id, then raw name, then sanitized name.
    #[must_use]
    pub fn lookup(&self, id: i64, name: &str) -> &[String] {
        let by_id = id.to_string();
        let safe = sanitize_name(name);
        [by_id.as_str(), name, safe.as_str()]
            .into_iter()
            .filter(|key| !key.is_empty())
            .find_map(|key| self.entries.get(key))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_with_numeric_keys() {
        let map = AssetMap::parse("3: a.png\nStonehaven:\n  - b\n  - c.svg\n").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup(3, "Whatever"), ["a.png".to_string()]);
        assert_eq!(map.lookup(1, "Stonehaven"), ["b", "c.svg"]);
    }

    #[test]
    fn parses_json() {
        let map = AssetMap::parse(r#"{"7": ["x.png"], "Port_Royal": "y.png"}"#).unwrap();
        assert_eq!(map.lookup(7, ""), ["x.png"]);
        assert_eq!(map.lookup(8, "Port Royal"), ["y.png"]);
    }

    #[test]
    fn id_wins_over_name() {
        let map = AssetMap::parse("1: by-id.png\nAsh: by-name.png\n").unwrap();
        assert_eq!(map.lookup(1, "Ash"), ["by-id.png"]);
    }

    #[test]
    fn missing_entry_is_empty() {
        let map = AssetMap::parse("1: a.png\n").unwrap();
        assert!(map.lookup(2, "Nope").is_empty());
    }

    #[test]
    fn empty_text_is_empty_map() {
        assert!(AssetMap::parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mapping() {
        assert!(AssetMap::parse("- a\n- b\n").is_err());
    }

    #[test]
    fn load_reports_path() {
        let err = AssetMap::load(Path::new("/nonexistent/fmg_vault_map.yaml")).unwrap_err();
        assert!(err.to_string().contains("fmg_vault_map.yaml"));
    }
}
