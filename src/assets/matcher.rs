//! Candidate selection for MFCG assets.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::warn;

use crate::config::{AssetMap, MatchStrategy, MfcgOptions};
use crate::entities::EntityKind;
use crate::error::ConfigError;
use crate::vault::sanitize_name;

/// A direct child of the MFCG source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File or directory name.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Whether the child is a directory.
    pub is_dir: bool,
}

impl Candidate {
    /// Name without its extension for files, the full name for directories.
    #[must_use]
    pub fn stem(&self) -> &str {
        if self.is_dir {
            return &self.name;
        }
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

/// The entity an asset lookup is for.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Entity kind.
    pub kind: EntityKind,
    /// Entity id.
    pub id: i64,
    /// Raw display name.
    pub name: &'a str,
}

impl Target<'_> {
    /// `{kind}-{id}`, `{id}`, `{safe}`, `{kind}-{id}-{safe}` with the
    /// given kind prefix. Tokens built from an empty sanitized name are
    /// left out.
    fn tokens(&self, prefix: &str) -> Vec<String> {
        let safe = sanitize_name(self.name);
        let mut tokens = vec![format!("{prefix}-{}", self.id), self.id.to_string()];
        if !safe.is_empty() {
            tokens.push(format!("{prefix}-{}-{safe}", self.id));
            tokens.push(safe);
        }
        tokens
    }
}

/// A compiled matching strategy.
#[derive(Debug)]
pub enum Matcher {
    /// Case-insensitive substring.
    Fuzzy,
    /// Case-sensitive equality with name or file stem.
    Exact,
    /// User pattern with `{id}` / `{name}` placeholders.
    Regex {
        /// Pattern as supplied.
        template: String,
        /// Pre-compiled pattern when the template has no placeholders.
        fixed: Option<Regex>,
    },
    /// Explicit map-file; no directory listing.
    Map {
        /// Parsed map.
        map: AssetMap,
        /// Base for relative paths in the map.
        base: PathBuf,
    },
}

const PLACEHOLDERS: [&str; 2] = ["{id}", "{name}"];

fn compile(template: &str, id: &str, name: &str) -> Result<Regex, ConfigError> {
    let pattern = template
        .replace("{id}", &regex::escape(id))
        .replace("{name}", &regex::escape(name));
    Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: template.to_string(),
        message: e.to_string(),
    })
}

impl Matcher {
    /// Builds the matcher for `options`, validating the pattern or loading
    /// the map-file up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required pattern or map-file is
    /// missing, the pattern does not compile, or the map-file is unreadable.
    pub fn from_options(options: &MfcgOptions) -> Result<Self, ConfigError> {
        match options.strategy {
            MatchStrategy::Fuzzy => Ok(Self::Fuzzy),
            MatchStrategy::Exact => Ok(Self::Exact),
            MatchStrategy::Regex => {
                let template =
                    options
                        .pattern
                        .clone()
                        .ok_or(ConfigError::MissingRequirement {
                            strategy: "regex",
                            requirement: "--mfcg-pattern",
                        })?;
                // Probe with sample values so a broken pattern fails before
                // any document is written.
                let probe = compile(&template, "1", "Probe")?;
                let fixed = if PLACEHOLDERS.iter().any(|p| template.contains(p)) {
                    None
                } else {
                    Some(probe)
                };
                Ok(Self::Regex { template, fixed })
            }
            MatchStrategy::Map => {
                let path = options
                    .map_file
                    .as_deref()
                    .ok_or(ConfigError::MissingRequirement {
                        strategy: "map",
                        requirement: "--mfcg-map",
                    })?;
                Ok(Self::Map {
                    map: AssetMap::load(path)?,
                    base: options.source_dir.clone(),
                })
            }
        }
    }

    /// Whether this strategy needs a listing of the source directory.
    #[must_use]
    pub const fn scans_directory(&self) -> bool {
        !matches!(self, Self::Map { .. })
    }

    /// Selects the sources for `target`, in listing order (or map order).
    #[must_use]
    pub fn select(&self, target: Target<'_>, listing: &[Candidate]) -> Vec<PathBuf> {
        match self {
            Self::Fuzzy => {
                let tokens: Vec<String> = target
                    .tokens(target.kind.slug())
                    .into_iter()
                    .map(|t| t.to_lowercase())
                    .collect();
                listing
                    .iter()
                    .filter(|c| {
                        let name = c.name.to_lowercase();
                        tokens.iter().any(|t| name.contains(t.as_str()))
                    })
                    .map(|c| c.path.clone())
                    .collect()
            }
            Self::Exact => {
                let tokens = target.tokens(target.kind.label());
                listing
                    .iter()
                    .filter(|c| tokens.iter().any(|t| t == &c.name || t == c.stem()))
                    .map(|c| c.path.clone())
                    .collect()
            }
            Self::Regex { template, fixed } => {
                let compiled;
                let regex = if let Some(regex) = fixed {
                    regex
                } else {
                    let safe = sanitize_name(target.name);
                    match compile(template, &target.id.to_string(), &safe) {
                        Ok(regex) => {
                            compiled = regex;
                            &compiled
                        }
                        Err(e) => {
                            warn!(kind = %target.kind, id = target.id, error = %e, "pattern rejected");
                            return Vec::new();
                        }
                    }
                };
                listing
                    .iter()
                    .filter(|c| regex.is_match(&c.name))
                    .map(|c| c.path.clone())
                    .collect()
            }
            Self::Map { map, base } => map
                .lookup(target.id, target.name)
                .iter()
                .map(|entry| {
                    let path = Path::new(entry);
                    if path.is_absolute() {
                        path.to_path_buf()
                    } else {
                        base.join(path)
                    }
                })
                .collect(),
        }
    }
}
