//! Province documents.

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::error::Result;
use crate::pack::{Pack, Record};
use crate::vault::Frontmatter;

/// Writes one document per province.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::Province);
    info!(count = records.len(), "writing provinces");
    for record in records {
        let document = document(session, &record).await;
        session.write(&document)?;
    }
    Ok(())
}

async fn document(session: &mut Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::Province;
    let id = record.id();
    let name = record.name(kind);
    let emblem = session.emblems.resolve(kind, id, record).await;

    let mut fm = Frontmatter::new();
    fm.insert("province_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("state", record.field_or("state", 0))
        .insert("capital_burg", record.field_or("burg", 0))
        .insert("burgs", record.field_or("burgs", Value::Array(Vec::new())))
        .insert("cells", record.field_or("cells", Value::Array(Vec::new())));
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }

    let mut body = Body::titled(heading(kind, id, &name));
    body.emblem(emblem.as_deref())
        .relation("State", session.link(EntityKind::State, record.int("state")))
        .relation("Capital", session.link(EntityKind::Burg, record.int("burg")))
        .relation("Burgs", session.link_list(EntityKind::Burg, &record.ids("burgs")));

    Document {
        kind,
        stem: kind.stem(id, &name),
        frontmatter: fm,
        body: body.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::{Harness, pack};
    use serde_json::json;

    #[tokio::test]
    async fn capital_comes_from_burg_field() {
        let p = pack(json!({
            "provinces": [0, {"i": 1, "name": "West March", "state": 1, "burg": 3,
                              "burgs": [3, 4], "emblem_url": "/nonexistent/fmg_vault_p.png"}],
            "burgs": [0, {"i": 1}, {"i": 2}, {"i": 3, "name": "Ash"}, {"i": 4, "name": "Elm"}]
        }));
        let mut h = Harness::new(&p);
        process(&mut h.session, &p).await.unwrap();

        let (fm, body) = h.read(EntityKind::Province, "Province-1-West_March").unwrap();
        assert_eq!(fm.get("capital_burg"), Some(&json!(3)));
        assert_eq!(fm.get("cells"), Some(&json!([])));
        // An unreadable emblem is dropped, not fatal.
        assert!(!fm.contains_key("emblem_url"));
        assert_eq!(h.session.emblems.stats().failed, 1);
        assert!(body.contains("Capital → [[Burgs/Burg-3-Ash]]"));
        assert!(body.contains("Burgs → [[Burgs/Burg-3-Ash]], [[Burgs/Burg-4-Elm]]"));
        assert!(body.contains("State → [[States/State-1]]"));
    }
}
