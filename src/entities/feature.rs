//! Terrain feature documents.
//!
//! Features have no name; their `type` (ocean, island, lake) stands in
//! for it in the filename.

use serde_json::Value;
use tracing::info;

use super::{Body, Document, EntityKind, Session};
use crate::error::Result;
use crate::pack::{Pack, Record};
use crate::vault::{Frontmatter, to_literal};

/// Writes one document per feature.
///
/// # Errors
///
/// Returns an error if a document cannot be written.
pub async fn process(session: &mut Session, pack: &Pack) -> Result<()> {
    let records = session.records(pack, EntityKind::Feature);
    info!(count = records.len(), "writing features");
    for record in records {
        let document = document(session, &record).await;
        session.write(&document)?;
    }
    Ok(())
}

async fn document(session: &mut Session, record: &Record<'_>) -> Document {
    let kind = EntityKind::Feature;
    let id = record.id();
    let feature_type = record.name(kind);
    let emblem = session.emblems.resolve(kind, id, record).await;
    let cells = record.field_or("cells", Value::Array(Vec::new()));

    let mut fm = Frontmatter::new();
    fm.insert("feature_id", id)
        .insert("type", record.field_or("type", ""))
        .insert("group", record.field_or("group", ""))
        .insert("cells", cells.clone());
    if let Some(path) = &emblem {
        fm.insert("emblem_url", path.as_str());
    }

    let mut body = Body::titled(format!("Feature {id} ({feature_type})"));
    body.emblem(emblem.as_deref())
        .line(format!("Cells → {}", to_literal(&cells)));

    Document {
        kind,
        stem: kind.stem(id, &feature_type),
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
    async fn named_by_type_and_sentinel_skipped() {
        let p = pack(json!({"features": [
            0,
            {"i": 1, "type": "ocean", "group": "ocean", "cells": 5120},
            {"i": 2, "type": "lake", "group": "freshwater"},
            {"i": 3}
        ]}));
        let mut h = Harness::new(&p);
        process(&mut h.session, &p).await.unwrap();

        assert_eq!(
            h.stems(EntityKind::Feature),
            ["Feature-1-ocean", "Feature-2-lake", "Feature-3"]
        );
        let (fm, body) = h.read(EntityKind::Feature, "Feature-1-ocean").unwrap();
        assert_eq!(fm.get("cells"), Some(&json!(5120)));
        assert_eq!(body, "# Feature 1 (ocean)\nCells → 5120\n");

        let (fm, _) = h.read(EntityKind::Feature, "Feature-3").unwrap();
        assert_eq!(fm.get("type"), Some(&json!("")));
        assert_eq!(fm.get("cells"), Some(&json!([])));
    }
}
