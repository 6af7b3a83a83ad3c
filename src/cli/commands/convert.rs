//! `convert` command.

use crate::cli::args::{ConvertArgs, OutputFormat};
use crate::config::{ConvertConfig, LoreOptions, MfcgOptions};
use crate::error::VaultError;
use crate::observability::ConversionReport;

/// Builds the library configuration for a `convert` invocation.
#[must_use]
pub fn build_config(args: &ConvertArgs) -> ConvertConfig {
    let mut config = ConvertConfig::new(&args.map_file, &args.outdir);
    config.mfcg = args.mfcg_dir.as_ref().map(|dir| MfcgOptions {
        strategy: args.mfcg_match.unwrap_or_default(),
        pattern: args.mfcg_pattern.clone(),
        map_file: args.mfcg_map.clone(),
        dedupe: args.dedupe,
        archive: args.archive,
        ..MfcgOptions::new(dir)
    });
    config.emblems.download = args.download_emblems;
    config.frontmatter = args.frontmatter;
    config.lore = args.lore.then(|| LoreOptions {
        seed: args.lore_seed.unwrap_or_default(),
    });
    config
}

/// Runs a conversion and prints its summary.
///
/// # Errors
///
/// Returns an error if the conversion fails or the JSON summary cannot be
/// serialized.
pub async fn run(args: &ConvertArgs) -> Result<(), VaultError> {
    let config = build_config(args);
    let report = crate::convert::convert(&config).await?;
    print_report(&report, args.format)
}

fn print_report(report: &ConversionReport, format: OutputFormat) -> Result<(), VaultError> {
    match format {
        OutputFormat::Human => println!("{}", report.summary_line()),
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
    }
    Ok(())
}
