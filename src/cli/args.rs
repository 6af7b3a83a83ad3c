//! CLI argument definitions.
//!
//! All Clap derive structs for `fmg-vault` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_OUTPUT_DIR, MatchStrategy};
use crate::vault::FrontmatterFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Convert Fantasy Map Generator exports into a linked Markdown vault.
#[derive(Parser, Debug)]
#[command(name = "fmg-vault", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "FMG_VAULT_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a map export into a vault.
    Convert(ConvertArgs),

    /// Count the entities of a map export without writing anything.
    Inspect(InspectArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Convert / Inspect
// ============================================================================

/// Arguments for `convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the FMG JSON export.
    pub map_file: PathBuf,

    /// Vault root directory.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, env = "FMG_VAULT_OUTDIR")]
    pub outdir: PathBuf,

    /// Directory of MFCG exports to link into burg documents.
    #[arg(long, env = "FMG_VAULT_MFCG_DIR")]
    pub mfcg_dir: Option<PathBuf>,

    /// How MFCG exports are matched to burgs [default: fuzzy].
    #[arg(long = "mfcg-match", requires = "mfcg_dir")]
    pub mfcg_match: Option<MatchStrategy>,

    /// Pattern for the regex strategy; `{id}` and `{name}` are substituted.
    #[arg(long, requires = "mfcg_dir")]
    pub mfcg_pattern: Option<String>,

    /// YAML or JSON file mapping burg ids or names to MFCG paths.
    #[arg(long, requires = "mfcg_dir")]
    pub mfcg_map: Option<PathBuf>,

    /// Store identical MFCG files once and reference the stored copy.
    #[arg(long, requires = "mfcg_dir")]
    pub dedupe: bool,

    /// Bundle each burg's MFCG assets into a single zip archive.
    #[arg(long, requires = "mfcg_dir")]
    pub archive: bool,

    /// Download emblems referenced by HTTP(S) URL.
    #[arg(long, env = "FMG_VAULT_DOWNLOAD_EMBLEMS")]
    pub download_emblems: bool,

    /// Frontmatter rendering.
    #[arg(long, default_value = "literal")]
    pub frontmatter: FrontmatterFormat,

    /// Add generated lore to burg documents.
    #[arg(long)]
    pub lore: bool,

    /// Seed for generated lore [default: 0].
    #[arg(long, requires = "lore")]
    pub lore_seed: Option<u64>,

    /// Summary output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the FMG JSON export.
    pub map_file: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["fmg-vault", "convert", "map.json"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Convert(args) => args,
            other => panic!("expected convert, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_defaults() {
        let args = convert_args(&[]);
        assert_eq!(args.map_file, PathBuf::from("map.json"));
        assert_eq!(args.mfcg_match, None);
        assert_eq!(args.frontmatter, FrontmatterFormat::Literal);
        assert_eq!(args.format, OutputFormat::Human);
        assert_eq!(args.lore_seed, None);
        assert!(args.mfcg_dir.is_none());
        assert!(!args.dedupe && !args.archive && !args.lore);
    }

    #[test]
    fn test_convert_full() {
        let args = convert_args(&[
            "-o",
            "Vault",
            "--mfcg-dir",
            "exports",
            "--mfcg-match",
            "regex",
            "--mfcg-pattern",
            "^burg_{id}",
            "--dedupe",
            "--archive",
            "--frontmatter",
            "yaml",
            "--lore",
            "--lore-seed",
            "42",
            "--format",
            "json",
        ]);
        assert_eq!(args.outdir, PathBuf::from("Vault"));
        assert_eq!(args.mfcg_match, Some(MatchStrategy::Regex));
        assert_eq!(args.mfcg_pattern.as_deref(), Some("^burg_{id}"));
        assert!(args.dedupe && args.archive && args.lore);
        assert_eq!(args.frontmatter, FrontmatterFormat::Yaml);
        assert_eq!(args.lore_seed, Some(42));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_mfcg_options_require_dir() {
        for extra in [
            &["--dedupe"][..],
            &["--mfcg-match", "exact"][..],
            &["--archive"][..],
        ] {
            let mut argv = vec!["fmg-vault", "convert", "map.json"];
            argv.extend_from_slice(extra);
            assert!(Cli::try_parse_from(argv).is_err(), "accepted {extra:?}");
        }
    }

    #[test]
    fn test_match_strategies_parse() {
        for strategy in ["fuzzy", "exact", "regex", "map"] {
            let cli = Cli::try_parse_from([
                "fmg-vault",
                "convert",
                "map.json",
                "--mfcg-dir",
                "x",
                "--mfcg-match",
                strategy,
            ]);
            assert!(cli.is_ok(), "Failed to parse strategy={strategy}");
        }
    }

    #[test]
    fn test_lore_seed_requires_lore() {
        let result = Cli::try_parse_from(["fmg-vault", "convert", "map.json", "--lore-seed", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_requires_map_file() {
        let result = Cli::try_parse_from(["fmg-vault", "convert"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inspect_format() {
        let cli = Cli::try_parse_from(["fmg-vault", "inspect", "map.json", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => assert_eq!(args.format, OutputFormat::Json),
            other => panic!("expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["fmg-vault", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["fmg-vault", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["fmg-vault", "--color", variant, "version"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["fmg-vault", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count_and_quiet() {
        let cli = Cli::try_parse_from(["fmg-vault", "-vvv", "--quiet", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(cli.quiet);
    }

    #[test]
    fn test_exit_code_mapping() {
        use crate::error::{ConfigError, ExitCode, InputError, VaultError};

        let cases: Vec<(VaultError, i32)> = vec![
            (
                InputError::MissingCollection { name: "pack" }.into(),
                ExitCode::INPUT_ERROR,
            ),
            (
                ConfigError::MissingRequirement {
                    strategy: "regex",
                    requirement: "--mfcg-pattern",
                }
                .into(),
                ExitCode::USAGE_ERROR,
            ),
            (
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "x").into(),
                ExitCode::IO_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "Wrong exit code for {err}");
        }
    }
}
