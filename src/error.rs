//! Error types for `fmg-vault`
//!
//! Fatal errors abort a conversion and map to a process exit code.
//! Asset and per-record problems are represented here too, but callers
//! log them and carry on instead of propagating.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `fmg-vault` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Input document error (missing file, malformed JSON, no `pack`)
    pub const INPUT_ERROR: i32 = 2;

    /// I/O error while writing the vault
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid pattern, unreadable map-file)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `fmg-vault` operations.
///
/// Aggregates the fatal error domains and maps each one to an exit code.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Input document could not be loaded
    #[error(transparent)]
    Input(#[from] InputError),

    /// Conversion options are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => ExitCode::INPUT_ERROR,
            Self::Config(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) | Self::Yaml(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Input Errors
// ============================================================================

/// Failures while loading the map document. All of them are fatal.
#[derive(Debug, Error)]
pub enum InputError {
    /// Map file does not exist or cannot be opened
    #[error("cannot open map file {path}: {source}")]
    Unreadable {
        /// Path to the map file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Map file is not valid JSON
    #[error("parse error in {path} at line {line}, column {column}: {message}")]
    Parse {
        /// Path to the map file
        path: PathBuf,
        /// Line where parsing failed
        line: usize,
        /// Column where parsing failed
        column: usize,
        /// Error message from the parser
        message: String,
    },

    /// A required top-level collection is absent
    #[error("input document does not contain a top-level '{name}' collection")]
    MissingCollection {
        /// Name of the missing collection
        name: &'static str,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Invalid conversion options, detected before any output is written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The MFCG regex pattern does not compile
    #[error("invalid MFCG pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as supplied
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A strategy was chosen without the input it needs
    #[error("MFCG strategy '{strategy}' requires {requirement}")]
    MissingRequirement {
        /// Strategy name
        strategy: &'static str,
        /// What is missing
        requirement: &'static str,
    },

    /// The explicit asset map could not be read or parsed
    #[error("cannot load MFCG map file {path}: {message}")]
    MapFile {
        /// Path to the map file
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

// ============================================================================
// Asset Errors
// ============================================================================

/// Asset-resolution failures. These never abort a run; the affected asset
/// is skipped and the failure is logged.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Source file could not be read or copied
    #[error("cannot copy {path}: {source}")]
    Copy {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Remote fetch failed
    #[error("download of {url} failed: {message}")]
    Download {
        /// The URL that was requested
        url: String,
        /// Error description
        message: String,
    },

    /// The per-entity archive could not be written or verified
    #[error("cannot archive {path}: {message}")]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Error description
        message: String,
    },
}

// ============================================================================
// Frontmatter Errors
// ============================================================================

/// Failures while reading a generated document back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// Input ended in the middle of a literal
    #[error("unexpected end of literal")]
    UnexpectedEnd,

    /// A character that cannot start or continue a literal here
    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected {
        /// The offending character
        found: char,
        /// Byte offset into the literal
        offset: usize,
    },

    /// Unknown or malformed backslash escape
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    /// Numeric token that is neither an integer nor a finite float
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Mapping key that is not a string or integer
    #[error("unsupported mapping key at offset {0}")]
    InvalidKey(usize),

    /// Input continues after a complete literal
    #[error("trailing characters at offset {0}")]
    Trailing(usize),

    /// Document does not start with a `---` header block
    #[error("document has no frontmatter block")]
    MissingDelimiter,

    /// Header line without a `key: value` shape
    #[error("malformed frontmatter line: {0}")]
    MalformedLine(String),

    /// YAML header could not be parsed
    #[error("YAML frontmatter error: {0}")]
    Yaml(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `fmg-vault` operations.
pub type Result<T> = std::result::Result<T, VaultError>;

// ============================================================================
// Tests
// ============================================================================
