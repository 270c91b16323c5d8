use std::sync::Arc;

use newsroom_types::models::NewsItem;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NewNews, NewsPatch, NewsRow};
use crate::query::FindSpec;
use crate::{Database, StoreError};

/// Parses a caller-supplied identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Async access to news documents.
///
/// Each call runs one statement on the blocking pool. Dropping the returned
/// future abandons the call, but a statement already handed to the pool runs
/// to completion.
#[derive(Clone)]
pub struct NewsRepository {
    db: Arc<Database>,
}

impl NewsRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db)).await?
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<NewsItem>, StoreError> {
        let id = parse_id(id)?.to_string();
        self.run(move |db| db.get_news(&id))
            .await?
            .map(NewsRow::into_item)
            .transpose()
    }

    pub async fn find_many(&self, spec: FindSpec) -> Result<Vec<NewsItem>, StoreError> {
        let rows = self.run(move |db| db.find_news(&spec)).await?;
        rows.into_iter().map(NewsRow::into_item).collect()
    }

    pub async fn list_distinct_projects(&self) -> Result<Vec<Uuid>, StoreError> {
        let projects = self.run(|db| db.distinct_projects()).await?;
        projects
            .iter()
            .map(|p| Uuid::parse_str(p).map_err(|e| StoreError::Corrupt(format!("project '{}': {}", p, e))))
            .collect()
    }

    /// Inserts under a freshly generated id and returns the stored document.
    pub async fn insert(&self, doc: NewNews) -> Result<NewsItem, StoreError> {
        let id = Uuid::new_v4().to_string();
        let row = self
            .run(move |db| {
                db.insert_news(&id, &doc)?;
                db.get_news(&id)?
                    .ok_or_else(|| StoreError::Corrupt(format!("inserted news '{}' not readable", id)))
            })
            .await?;

        debug!("Inserted news {}", row.id);
        row.into_item()
    }

    pub async fn update_by_id(&self, id: &str, patch: NewsPatch) -> Result<Option<NewsItem>, StoreError> {
        let id = parse_id(id)?.to_string();
        self.run(move |db| db.update_news(&id, &patch))
            .await?
            .map(NewsRow::into_item)
            .transpose()
    }

    /// Returns whether a document existed, and if so the external post id it
    /// carried before deletion.
    pub async fn delete_by_id(&self, id: &str) -> Result<(bool, Option<i64>), StoreError> {
        let id = parse_id(id)?.to_string();
        let prior = self.run(move |db| db.delete_news(&id)).await?;

        Ok(match prior {
            Some(post_id) => (true, post_id),
            None => (false, None),
        })
    }

    pub async fn set_external_post_id(&self, id: Uuid, post_id: i64) -> Result<Option<NewsItem>, StoreError> {
        self.run(move |db| db.set_external_post_id(&id.to_string(), post_id))
            .await?
            .map(NewsRow::into_item)
            .transpose()
    }
}
