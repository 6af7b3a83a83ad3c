//! Culture documents.
//!
//! Cultures do not list their members in the export, so `states` and
//! `burgs` are collected by scanning those collections for records whose
//! `culture` points back at the culture.

use std::collections::HashMap;

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session, heading};
use crate::error::Result;
use crate::pack::{Pack, Record, as_int};
use crate::vault::Frontmatter;

/// Member ids of `kind` grouped by their `culture` field.
fn members_by_culture(pack: &Pack, kind: EntityKind) -> HashMap<i64, Vec<i64>> {
    let mut members: HashMap<i64, Vec<i64>> = HashMap::new();
    for record in pack.records(kind) {
        if let Some(culture) = record.get("culture").and_then(as_int) {
            members.entry(culture).or_default().push(record.id());
        }
    }
    members
}

/// Writes one document per culture.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::Culture);
    info!(count = records.len(), "writing cultures");

    let states = members_by_culture(pack, EntityKind::State);
    let burgs = members_by_culture(pack, EntityKind::Burg);
    for record in records {
        let id = record.id();
        let members = Members {
            states: states.get(&id).map_or(&[][..], Vec::as_slice),
            burgs: burgs.get(&id).map_or(&[][..], Vec::as_slice),
        };
        let document = document(session, &record, &members).await;
        session.write(&document)?;
    }
    Ok(())
}

struct Members<'a> {
    states: &'a [i64],
    burgs: &'a [i64],
}

async fn document(session: &mut Session, record: &Record<'_>, members: &Members<'_>) -> Document {
    let kind = EntityKind::Culture;
    let id = record.id();
    let name = record.name(kind);
    let emblem = session.emblems.resolve(kind, id, record).await;

    let mut fm = Frontmatter::new();
    fm.insert("culture_id", id)
        .insert("name", record.field_or("name", ""))
        .insert("origins", record.field_or("origins", Value::Array(Vec::new())))
        .insert("states", members.states.to_vec())
        .insert("burgs", members.burgs.to_vec())
        .insert("color", record.field_or("color", ""))
        .insert("expansionism", record.field_or("expansionism", 1.0));
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }

    let mut body = Body::titled(heading(kind, id, &name));
    body.emblem(emblem.as_deref())
        .relation("Origins", session.link_list(kind, &record.ids("origins")))
        .relation("States", session.link_list(EntityKind::State, members.states))
        .relation("Burgs", session.link_list(EntityKind::Burg, members.burgs));

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
    async fn members_are_derived_by_reverse_lookup() {
        let p = pack(json!({
            "cultures": [
                {"i": 0, "name": "Wildlands"},
                {"i": 1, "name": "Avarian", "origins": [0], "color": "#aa3300"},
                {"i": 2, "name": "Borlish", "origins": [1], "expansionism": 2.5}
            ],
            "states": [0, {"i": 1, "name": "Avaria", "culture": 1}, {"i": 2, "culture": 2}],
            "burgs": [0, {"i": 1, "name": "Ash", "culture": 1}, {"i": 2, "culture": 1}]
        }));
        let mut h = Harness::new(&p);
        process(&mut h.session, &p).await.unwrap();

        let (fm, body) = h.read(EntityKind::Culture, "Culture-1-Avarian").unwrap();
        assert_eq!(fm.get("states"), Some(&json!([1])));
        assert_eq!(fm.get("burgs"), Some(&json!([1, 2])));
        assert_eq!(fm.get("expansionism"), Some(&json!(1.0)));
        assert_eq!(fm.get("color"), Some(&json!("#aa3300")));
        assert!(body.contains("States → [[States/State-1-Avaria]]"));
        assert!(body.contains("Burgs → [[Burgs/Burg-1-Ash]], [[Burgs/Burg-2]]"));
        assert!(!body.contains("Origins"));

        let (fm, body) = h.read(EntityKind::Culture, "Culture-2-Borlish").unwrap();
        assert_eq!(fm.get("states"), Some(&json!([2])));
        assert_eq!(fm.get("burgs"), Some(&json!([])));
        assert_eq!(fm.get("expansionism"), Some(&json!(2.5)));
        assert!(body.contains("Origins → [[Cultures/Culture-1-Avarian]]"));
    }
}
