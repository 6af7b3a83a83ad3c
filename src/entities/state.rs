//! State documents.

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::error::Result;
use crate::pack::{Pack, Record};
use crate::vault::Frontmatter;

/// Writes one document per state.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::State);
    info!(count = records.len(), "writing states");
    for record in records {
        let document = document(session, &record).await;
        session.write(&document)?;
    }
    Ok(())
}

async fn document(session: &mut Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::State;
    let id = record.id();
    let name = record.name(kind);
    let emblem = session.emblems.resolve(kind, id, record).await;

    let mut fm = Frontmatter::new();
    fm.insert("state_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("form", record.field_or("form", ""))
        .insert("culture", record.field_or("culture", 0))
        .insert("capital_burg", record.field_or("capital", 0))
        .insert("provinces", record.field_or("provinces", Value::Array(Vec::new())))
        .insert("neighbors", record.field_or("neighbors", Value::Array(Vec::new())))
        .insert("burgs", record.field_or("burgs", Value::Array(Vec::new())));
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }

    let mut body = Body::titled(heading(kind, id, &name));
    body.emblem(emblem.as_deref())
        .relation("Culture", session.link(EntityKind::Culture, record.int("culture")))
        .relation("Capital", session.link(EntityKind::Burg, record.int("capital")))
        .relation(
            "Provinces",
            session.link_list(EntityKind::Province, &record.ids("provinces")),
        )
        .relation(
            "Neighbors",
            session.link_list(EntityKind::State, &record.ids("neighbors")),
        );

    Document {
        kind,
        stem: kind.stem(id, &name),
        frontmatter: fm,
        body: body.build(),
    }
}
