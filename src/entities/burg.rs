//! Settlement documents.
//!
//! Burgs are the richest documents in the vault: besides their own
//! attributes they carry the emblem, any MFCG exports matched to the
//! settlement, and optionally generated lore.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::assets::Target;
use crate::error::Result;
use crate::lore::BurgLore;
use crate::pack::{Pack, Record, as_int};
use crate::vault::Frontmatter;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "svg", "jpg", "jpeg", "gif", "webp"];

/// Writes one document per settlement.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::Burg);
    info!(count = records.len(), "writing burgs");
    for record in records {
        let document = document(session, &record).await;
        session.write(&document)?;
    }
    Ok(())
}

/// `![[path]]` for images Obsidian can embed, `[[path]]` otherwise.
fn asset_line(path: &str) -> String {
    let is_image = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if is_image {
        format!("- ![[{path}]]")
    } else {
        format!("- [[{path}]]")
    }
}

async fn document(session: &mut Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::Burg;
    let id = record.id();
    let name = record.name(kind);

    // Assets first so the header can reference them.
    let assets = session
        .assets
        .as_mut()
        .map(|resolver| resolver.resolve(Target { kind, id, name: &name }))
        .unwrap_or_default();
    let emblem = session.emblems.resolve(kind, id, record).await;
    let lore = session
        .lore
        .map(|options| BurgLore::generate(options.seed, id, &name));

    let mut fm = Frontmatter::new();
    fm.insert("burg_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("cell", record.field_or("cell", 0))
        .insert("culture", record.field_or("culture", 0))
        .insert("state", record.field_or("state", 0))
        .insert("feature", record.field_or("feature", 0))
        .insert("population", record.field_or("population", 0))
        .insert("type", record.field_or("type", ""))
        .insert("capital", record.field_or("capital", false))
        .insert("port", record.field_or("port", false))
        .insert("citadel", record.field_or("citadel", false))
        .insert("plaza", record.field_or("plaza", false))
        .insert("temple", record.field_or("temple", false))
        .insert("walls", record.field_or("walls", false));
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }
    if !assets.is_empty() {
        fm.insert(
            "mfcg_assets",
            Value::Array(assets.iter().map(|a| Value::from(a.as_str())).collect()),
        );
    }
    if let Some(lore) = &lore {
        fm.insert("history", lore.history.as_str())
            .insert("festivals", lore.festivals.clone())
            .insert("rulers", lore.rulers.clone())
            .insert("myths", lore.myths.clone());
    }

    let reference = |key: &str, target: EntityKind| {
        record
            .get(key)
            .and_then(as_int)
            .and_then(|ref_id| session.link(target, ref_id))
    };

    let mut body = Body::titled(heading(kind, id, &name));
    body.emblem(emblem.as_deref());
    if let Some(cell) = reference("cell", EntityKind::Cell) {
        body.line(format!("Located in {cell}"));
    }
    body.relation("Culture", reference("culture", EntityKind::Culture))
        .relation("State", reference("state", EntityKind::State))
        .relation("Feature", reference("feature", EntityKind::Feature));

    if !assets.is_empty() {
        let lines: Vec<String> = assets.iter().map(|a| asset_line(a)).collect();
        body.section(&format!("## MFCG Assets\n{}", lines.join("\n")));
    }
    if let Some(lore) = &lore {
        body.section(&lore.section());
    }

    Document {
        kind,
        stem: kind.stem(id, &name),
        frontmatter: fm,
        body: body.build(),
    }
}
