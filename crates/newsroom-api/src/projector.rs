//! Maps a caller-supplied record to the document written for each intent.
//! Only title, project, type, content, thumbnail and featured are writable;
//! empty values count as "not set".

use uuid::Uuid;

use newsroom_db::models::{NewNews, NewsPatch};
use newsroom_types::models::NewsInput;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Document for a new item, stamped with `now_ms`.
pub fn to_create_document(input: &NewsInput, project: Uuid, now_ms: i64) -> NewNews {
    NewNews {
        title: input.title.clone(),
        project,
        kind: input.kind.clone(),
        timestamp: now_ms,
        content: input.content.clone(),
        thumbnail: input.thumbnail.clone(),
        featured: input.featured.as_deref().and_then(non_empty),
    }
}

/// Partial document for an update. Unset fields are omitted so they keep
/// their stored values; this also means `featured` cannot be cleared here.
pub fn to_update_document(input: &NewsInput, project: Option<Uuid>) -> NewsPatch {
    NewsPatch {
        title: non_empty(&input.title),
        project: project.filter(|p| !p.is_nil()),
        kind: non_empty(&input.kind),
        content: non_empty(&input.content),
        thumbnail: non_empty(&input.thumbnail),
        featured: input.featured.as_deref().and_then(non_empty),
    }
}
