use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::queries::ddl;

/// Open a file-based database pool for production use
/// Enables WAL mode and foreign keys, creating the file if missing
pub async fn open_database_pool(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);
    SqlitePool::connect_with(options).await
}

/// Create the segments, places and media tables plus their indexes
/// Safe to run repeatedly (all statements are IF NOT EXISTS)
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        ddl::create_segments_table(),
        ddl::create_places_table(),
        ddl::create_media_table(),
        ddl::create_segments_country_index(),
        ddl::create_places_segment_id_index(),
        ddl::create_media_taken_at_index(),
    ];
    for sql in &statements {
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

/// Create an in-memory database pool with the schema applied, for testing
///
/// Capped at a single connection: each sqlite in-memory connection is its
/// own database, so a larger pool would hand out empty databases.
pub async fn create_test_pool_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    init_database_schema(&pool).await?;
    Ok(pool)
}
