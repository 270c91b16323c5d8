use rusqlite::{OptionalExtension, Row};

use crate::models::{NewNews, NewsPatch, NewsRow};
use crate::query::{FindSpec, NEWS_COLUMNS};
use crate::{Database, StoreError};

impl Database {
    pub fn get_news(&self, id: &str) -> Result<Option<NewsRow>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM news WHERE id = ?1", NEWS_COLUMNS);
            let row = conn.query_row(&sql, [id], map_news_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_news(&self, spec: &FindSpec) -> Result<Vec<NewsRow>, StoreError> {
        let (sql, params) = spec.to_sql();

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params), map_news_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn distinct_projects(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT project FROM news ORDER BY project")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_news(&self, id: &str, doc: &NewNews) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO news (id, title, project, kind, timestamp, content, thumbnail, featured)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    doc.title,
                    doc.project.to_string(),
                    doc.kind,
                    doc.timestamp,
                    doc.content,
                    doc.thumbnail,
                    doc.featured,
                ],
            )?;
            Ok(())
        })
    }

    /// Applies the set fields of `patch` and returns the row as it reads
    /// after the update, or `None` when no row has this id.
    pub fn update_news(&self, id: &str, patch: &NewsPatch) -> Result<Option<NewsRow>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE news SET
                    title = COALESCE(?2, title),
                    project = COALESCE(?3, project),
                    kind = COALESCE(?4, kind),
                    content = COALESCE(?5, content),
                    thumbnail = COALESCE(?6, thumbnail),
                    featured = COALESCE(?7, featured)
                 WHERE id = ?1
                 RETURNING {}",
                NEWS_COLUMNS
            );
            let row = conn
                .query_row(
                    &sql,
                    rusqlite::params![
                        id,
                        patch.title,
                        patch.project.map(|p| p.to_string()),
                        patch.kind,
                        patch.content,
                        patch.thumbnail,
                        patch.featured,
                    ],
                    map_news_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Deletes a row. Returns `None` if it did not exist, otherwise the
    /// external post id it held before deletion.
    pub fn delete_news(&self, id: &str) -> Result<Option<Option<i64>>, StoreError> {
        self.with_conn(|conn| {
            let prior = conn
                .query_row(
                    "DELETE FROM news WHERE id = ?1 RETURNING external_post_id",
                    [id],
                    |row| row.get::<_, Option<i64>>(0),
                )
                .optional()?;
            Ok(prior)
        })
    }

    pub fn set_external_post_id(&self, id: &str, post_id: i64) -> Result<Option<NewsRow>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE news SET external_post_id = ?2 WHERE id = ?1 RETURNING {}",
                NEWS_COLUMNS
            );
            let row = conn
                .query_row(&sql, rusqlite::params![id, post_id], map_news_row)
                .optional()?;
            Ok(row)
        })
    }
}

fn map_news_row(row: &Row<'_>) -> rusqlite::Result<NewsRow> {
    Ok(NewsRow {
        id: row.get(0)?,
        title: row.get(1)?,
        project: row.get(2)?,
        kind: row.get(3)?,
        timestamp: row.get(4)?,
        content: row.get(5)?,
        thumbnail: row.get(6)?,
        featured: row.get(7)?,
        external_post_id: row.get(8)?,
    })
}
