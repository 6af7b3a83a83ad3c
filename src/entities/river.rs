//! River documents.
//!
//! Rivers are a dense list with no placeholder at index 0.

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::error::Result;
use crate::pack::{Pack, Record, as_int};
use crate::vault::{Frontmatter, to_literal};

/// Writes one document per river.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::River);
    info!(count = records.len(), "writing rivers");
    for record in records {
        let document = document(session, &record);
        session.write(&document)?;
    }
    Ok(())
}

fn document(session: &Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::River;
    let id = record.id();
    let name = record.name(kind);
    let cells = record.field_or("cells", Value::Array(Vec::new()));

    let mut fm = Frontmatter::new();
    fm.insert("river_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("source_cell", record.field_or("source", 0))
        .insert("mouth_cell", record.field_or("mouth", 0))
        .insert("basin", record.field_or("basin", 0))
        .insert("cells", cells.clone())
        .insert("length_km", record.field_or("length", 0))
        .insert("flux", record.field_or("discharge", 0));

    let cell_link = |key: &str| {
        record
            .get(key)
            .and_then(as_int)
            .and_then(|cell| session.link(EntityKind::Cell, cell))
    };
    let basin = record.get("basin").and_then(as_int).filter(|&b| b != id);

    let mut body = Body::titled(heading(kind, id, &name));
    body.line(format!("Flows through → {}", to_literal(&cells)))
        .relation("Source", cell_link("source"))
        .relation("Mouth", cell_link("mouth"))
        .relation("Basin", basin.and_then(|b| session.link(kind, b)));

    Document {
        kind,
        stem: kind.stem(id, &name),
        frontmatter: fm,
        body: body.build(),
    }
}
