//! Row and document types for the `news` table.
//! Distinct from the newsroom-types API models to keep the DB layer independent.

use newsroom_types::models::NewsItem;
use uuid::Uuid;

use crate::StoreError;

pub struct NewsRow {
    pub id: String,
    pub title: String,
    pub project: String,
    pub kind: String,
    pub timestamp: i64,
    pub content: String,
    pub thumbnail: String,
    pub featured: Option<String>,
    pub external_post_id: Option<i64>,
}

impl NewsRow {
    pub fn into_item(self) -> Result<NewsItem, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Corrupt(format!("id '{}': {}", self.id, e)))?;
        let project = Uuid::parse_str(&self.project).map_err(|e| {
            StoreError::Corrupt(format!("project '{}' on news '{}': {}", self.project, self.id, e))
        })?;

        Ok(NewsItem {
            id,
            title: self.title,
            project,
            kind: self.kind,
            timestamp: self.timestamp,
            content: self.content,
            thumbnail: self.thumbnail,
            featured: self.featured,
            external_post_id: self.external_post_id,
        })
    }
}

/// A complete document ready for insertion. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub project: Uuid,
    pub kind: String,
    pub timestamp: i64,
    pub content: String,
    pub thumbnail: String,
    pub featured: Option<String>,
}

/// A partial document for `$set`-style updates. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub project: Option<Uuid>,
    pub kind: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub featured: Option<String>,
}

impl NewsPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.project.is_none()
            && self.kind.is_none()
            && self.content.is_none()
            && self.thumbnail.is_none()
            && self.featured.is_none()
    }
}
