//! Religion documents.

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::error::Result;
use crate::pack::{Pack, Record};
use crate::vault::Frontmatter;

/// Writes one document per religion.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::Religion);
    info!(count = records.len(), "writing religions");
    for record in records {
        let document = document(session, &record).await;
        session.write(&document)?;
    }
    Ok(())
}

async fn document(session: &mut Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::Religion;
    let id = record.id();
    let name = record.name(kind);
    let emblem = session.emblems.resolve(kind, id, record).await;

    let mut fm = Frontmatter::new();
    fm.insert("religion_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("type", record.field_or("type", ""))
        .insert("deity", record.field_or("deity", ""))
        .insert("culture", record.field_or("culture", 0))
        .insert("origins", record.field_or("origins", Value::Array(Vec::new())));
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }

    let mut body = Body::titled(heading(kind, id, &name));
    body.emblem(emblem.as_deref())
        .relation("Culture", session.link(EntityKind::Culture, record.int("culture")))
        .relation("Origins", session.link_list(kind, &record.ids("origins")));

    Document {
        kind,
        stem: kind.stem(id, &name),
        frontmatter: fm,
        body: body.build(),
    }
}
