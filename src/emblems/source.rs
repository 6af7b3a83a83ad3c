//! Where an entity's emblem comes from.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::pack::Record;

/// Fallback extension when the source does not carry a usable one.
pub const DEFAULT_EXTENSION: &str = "png";

/// Emblem origin, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmblemSource<'a> {
    /// SVG markup embedded in the record (`coa.svg`).
    Inline(&'a str),
    /// Path on the local filesystem (`emblem_url`, optionally `file://`).
    Local(PathBuf),
    /// HTTP(S) URL (`emblem_url`).
    Remote(&'a str),
}

impl<'a> EmblemSource<'a> {
    /// Picks the emblem source of a record, if it has one.
    #[must_use]
    pub fn classify(record: &Record<'a>) -> Option<Self> {
        if let Some(svg) = record
            .get("coa")
            .and_then(|coa| coa.get("svg"))
            .and_then(Value::as_str)
            .filter(|svg| !svg.trim().is_empty())
        {
            return Some(Self::Inline(svg));
        }

        let url = record
            .get("emblem_url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())?;

        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(Self::Remote(url))
        } else if lower.starts_with("file://") {
            Some(Self::Local(PathBuf::from(&url["file://".len()..])))
        } else {
            Some(Self::Local(PathBuf::from(url)))
        }
    }

    /// File extension for the stored copy.
    #[must_use]
    pub fn extension(&self) -> String {
        match self {
            Self::Inline(_) => "svg".to_string(),
            Self::Local(path) => extension_of(&path.to_string_lossy()),
            Self::Remote(url) => extension_of(url),
        }
    }
}

/// Extension of the last path segment of `location`, ignoring any query or
/// fragment. Anything that does not look like an extension yields `png`.
#[must_use]
pub fn extension_of(location: &str) -> String {
    let without_suffix = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    let segment = without_suffix
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_suffix);
    Path::new(segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase)
}
