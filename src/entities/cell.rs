//! Cell documents.
//!
//! Cells are stored column-wise, so unlike every other kind they are
//! iterated by position over the height column rather than as records.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::{Body, Document, EntityKind, Session};
use crate::error::Result;
use crate::pack::{CellTable, Pack};
use crate::vault::Frontmatter;

/// Writes one document per cell.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let Some(table) = pack.cell_table() else {
        warn!(collection = "cells", "collection missing or not an object, skipping");
        session.report.record_missing(EntityKind::Cell);
        return Ok(());
    };

    info!(count = table.len(), "writing cells");
    for index in 0..table.len() {
        let document = document(session, &table, index);
        session.write(&document)?;
    }
    Ok(())
}

fn document(session: &Session, table: &CellTable<'_>, index: usize) -> Document {
    let id = i64::try_from(index).unwrap_or(i64::MAX);
    let routes = table
        .value("routes", index)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| json!({}));

    let mut fm = Frontmatter::new();
    fm.insert("cell_id", id)
        .insert("x", table.float("x", index))
        .insert("y", table.float("y", index))
        .insert("elevation", table.int("h", index))
        .insert("feature", table.int("f", index))
        .insert("biome", table.int("biome", index))
        .insert("burg", table.int("burg", index))
        .insert("culture", table.int("culture", index))
        .insert("state", table.int("state", index))
        .insert("province", table.int("province", index))
        .insert("religion", table.int("religion", index))
        .insert("population", table.float("pop", index))
        .insert("river", table.int("r", index))
        .insert("flux", table.int("fl", index))
        .insert("harbor_score", table.int("harbor", index))
        .insert("routes", routes);

    let related = [
        (EntityKind::Feature, "feature"),
        (EntityKind::Culture, "culture"),
        (EntityKind::State, "state"),
        (EntityKind::Province, "province"),
        (EntityKind::Religion, "religion"),
        (EntityKind::River, "river"),
        (EntityKind::Burg, "burg"),
    ];
    let links: Vec<String> = related
        .into_iter()
        .filter_map(|(kind, key)| {
            fm.get(key)
                .and_then(Value::as_i64)
                .and_then(|target| session.link(kind, target))
        })
        .collect();

    let mut body = Body::titled(format!("Cell {id}"));
    if !links.is_empty() {
        body.line(format!("Links → {}", links.join(", ")));
    }

    Document {
        kind: EntityKind::Cell,
        stem: EntityKind::Cell.stem(id, ""),
        frontmatter: fm,
        body: body.build(),
    }
}
