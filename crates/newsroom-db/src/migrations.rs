use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (news table)");
        conn.execute_batch(
            "
            CREATE TABLE news (
                id                  TEXT PRIMARY KEY,
                title               TEXT NOT NULL,
                project             TEXT NOT NULL,
                kind                TEXT NOT NULL,
                timestamp           INTEGER NOT NULL,
                content             TEXT NOT NULL,
                thumbnail           TEXT NOT NULL,
                featured            TEXT,
                external_post_id    INTEGER
            );

            CREATE INDEX idx_news_timestamp ON news(timestamp);
            CREATE INDEX idx_news_project ON news(project, timestamp);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
