//! Conversion configuration.
//!
//! Everything the orchestrator needs is passed in explicitly through
//! [`ConvertConfig`]; nothing is read from ambient state.

pub mod map_file;

pub use map_file::AssetMap;

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::vault::{FrontmatterFormat, VaultLayout};

/// Default output vault directory.
pub const DEFAULT_OUTPUT_DIR: &str = "World";

/// Default timeout for emblem downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// How MFCG assets are matched to a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Case-insensitive substring match on id/name tokens.
    #[default]
    Fuzzy,
    /// Case-sensitive equality with id/name tokens.
    Exact,
    /// User-supplied regular expression.
    Regex,
    /// Explicit id/name → path map-file.
    Map,
}

impl MatchStrategy {
    /// Name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Exact => "exact",
            Self::Regex => "regex",
            Self::Map => "map",
        }
    }
}

/// MFCG asset integration settings.
#[derive(Debug, Clone)]
pub struct MfcgOptions {
    /// Directory holding MFCG exports.
    pub source_dir: PathBuf,
    /// Matching strategy.
    pub strategy: MatchStrategy,
    /// Pattern for [`MatchStrategy::Regex`]; may contain `{id}` and `{name}`.
    pub pattern: Option<String>,
    /// Map-file for [`MatchStrategy::Map`].
    pub map_file: Option<PathBuf>,
    /// Deduplicate copies by content hash.
    pub dedupe: bool,
    /// Bundle each settlement's assets into one zip.
    pub archive: bool,
}

impl MfcgOptions {
    /// Fuzzy matching from `source_dir`, no dedupe, no archive.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            strategy: MatchStrategy::Fuzzy,
            pattern: None,
            map_file: None,
            dedupe: false,
            archive: false,
        }
    }
}

/// Emblem materialization settings.
#[derive(Debug, Clone)]
pub struct EmblemOptions {
    /// Fetch HTTP(S) emblem URLs.
    pub download: bool,
    /// Per-request timeout for downloads.
    pub timeout: Duration,
    /// Directory against which relative local emblem paths are tried first.
    pub base_dir: Option<PathBuf>,
}

impl Default for EmblemOptions {
    fn default() -> Self {
        Self {
            download: false,
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            base_dir: None,
        }
    }
}

/// Generated lore settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoreOptions {
    /// Base seed; each settlement derives its own stream from it.
    pub seed: u64,
}

/// Complete configuration of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Input map export.
    pub map_file: PathBuf,
    /// Output vault.
    pub layout: VaultLayout,
    /// MFCG asset integration, if enabled.
    pub mfcg: Option<MfcgOptions>,
    /// Emblem handling.
    pub emblems: EmblemOptions,
    /// Header rendering.
    pub frontmatter: FrontmatterFormat,
    /// Generated lore, if enabled.
    pub lore: Option<LoreOptions>,
}

impl ConvertConfig {
    /// Defaults for converting `map_file` into `output_root`.
    ///
    /// Relative local emblem paths resolve against the map file's directory.
    #[must_use]
    pub fn new(map_file: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        let map_file = map_file.into();
        let base_dir = map_file.parent().map(std::path::Path::to_path_buf);
        Self {
            map_file,
            layout: VaultLayout::new(output_root),
            mfcg: None,
            emblems: EmblemOptions {
                base_dir,
                ..EmblemOptions::default()
            },
            frontmatter: FrontmatterFormat::default(),
            lore: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConvertConfig::new("maps/world.json", DEFAULT_OUTPUT_DIR);
        assert_eq!(config.layout.root(), std::path::Path::new("World"));
        assert!(config.mfcg.is_none());
        assert!(!config.emblems.download);
        assert_eq!(config.emblems.timeout, Duration::from_secs(10));
        assert_eq!(
            config.emblems.base_dir.as_deref(),
            Some(std::path::Path::new("maps"))
        );
        assert_eq!(config.frontmatter, FrontmatterFormat::Literal);
        assert!(config.lore.is_none());
    }

    #[test]
    fn mfcg_defaults_to_fuzzy() {
        let opts = MfcgOptions::new("exports");
        assert_eq!(opts.strategy, MatchStrategy::Fuzzy);
        assert!(!opts.dedupe);
        assert!(!opts.archive);
    }

    #[test]
    fn strategy_names() {
        for (strategy, name) in [
            (MatchStrategy::Fuzzy, "fuzzy"),
            (MatchStrategy::Exact, "exact"),
            (MatchStrategy::Regex, "regex"),
            (MatchStrategy::Map, "map"),
        ] {
            assert_eq!(strategy.as_str(), name);
            assert_eq!(MatchStrategy::from_str(name, false), Ok(strategy));
        }
    }
}
