//! Conversion pipeline.
//!
//! Loads the map, validates the options that can fail up front, lays out
//! the vault and runs every entity processor in a fixed order. Only a
//! missing or malformed input, an invalid option, or a failed document
//! write stops a run; everything else is logged and counted.

use std::path::Path;

use tracing::info;

use crate::assets::AssetResolver;
use crate::config::ConvertConfig;
use crate::emblems::EmblemResolver;
use crate::entities::{self, EntityKind, Session};
use crate::error::Result;
use crate::observability::{ConversionReport, Inventory};
use crate::pack::{MapDocument, Pack};
use crate::vault::LinkIndex;

/// Loads the pack of a map export.
///
/// # Errors
///
/// Returns an input error if the file cannot be read, is not JSON, or has
/// no `pack`.
pub fn load_pack(path: &Path) -> Result<Pack> {
    Ok(MapDocument::load(path)?.into_pack()?)
}

/// Converts `config.map_file` into the vault described by `config`.
///
/// # Errors
///
/// Returns an error for an unusable input, an invalid MFCG configuration,
/// or a vault that cannot be written.
pub async fn convert(config: &ConvertConfig) -> Result<ConversionReport> {
    let pack = load_pack(&config.map_file)?;
    info!(map = %config.map_file.display(), "map loaded");
    convert_pack(config, &pack).await
}

/// Converts an already loaded pack.
///
/// # Errors
///
/// Returns an error for an invalid MFCG configuration or a vault that
/// cannot be written.
pub async fn convert_pack(config: &ConvertConfig, pack: &Pack) -> Result<ConversionReport> {
    let assets = match &config.mfcg {
        Some(options) => AssetResolver::new(options, config.layout.clone())?,
        None => None,
    };

    let layout = config.layout.clone();
    layout.ensure()?;
    info!(root = %layout.root().display(), "vault layout ready");

    let mut session = Session {
        links: LinkIndex::build(pack),
        format: config.frontmatter,
        emblems: EmblemResolver::new(layout.clone(), config.emblems.clone()),
        assets,
        lore: config.lore,
        report: ConversionReport::new(&config.map_file, layout.root()),
        layout,
    };

    for kind in EntityKind::ALL {
        let written = entities::process(kind, &mut session, pack).await?;
        info!(%kind, written, "processor finished");
    }

    let Session {
        mut report,
        emblems,
        assets,
        ..
    } = session;
    report.finish(emblems.stats(), assets.as_ref().map(AssetResolver::stats));
    info!(documents = report.total_documents(), "conversion finished");
    Ok(report)
}

/// Counts what a conversion of `path` would produce without writing.
///
/// # Errors
///
/// Returns an input error if the map cannot be loaded.
pub fn inspect(path: &Path) -> Result<Inventory> {
    let pack = load_pack(path)?;
    Ok(Inventory::from_pack(path, &pack))
}
