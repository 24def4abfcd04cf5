//! Data access for segments, places and media rows.
//!
//! The pipeline only sees the `JournalStore` trait; `SqlJournalStore` is the
//! SQLite implementation executing the `queries::*` builders over a sqlx
//! pool.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;

use crate::models::{NewMedia, Place, Segment};
use crate::queries;

/// Store-level error; wraps the underlying driver message
#[derive(Debug)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Store error: {}", self.0)
    }
}

impl StdError for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// Fields of a segment row created by the pipeline
#[derive(Debug, Clone)]
pub struct NewSegment {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_ms: i64,
    pub is_current: bool,
}

/// Fields of a place row created by the pipeline
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub segment_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub visited_ms: i64,
}

/// Relational access used by the ingestion pipeline and the status view
pub trait JournalStore {
    /// Id of the most recently created segment for `country`, if any
    fn latest_segment_id_for_country(
        &self,
        country: &str,
    ) -> impl Future<Output = Result<Option<i64>, StoreError>> + Send;

    /// Insert a segment and return its id
    fn insert_segment(
        &self,
        segment: &NewSegment,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Drop the `is_current` flag from every segment
    fn clear_current_segments(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All segments in arrival order
    fn list_segments(&self) -> impl Future<Output = Result<Vec<Segment>, StoreError>> + Send;

    /// Every known place, across all segments
    fn list_places(&self) -> impl Future<Output = Result<Vec<Place>, StoreError>> + Send;

    /// Insert a place and return its id
    fn insert_place(&self, place: &NewPlace)
        -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Refresh a place's last-visited timestamp
    fn touch_place_visit(
        &self,
        place_id: i64,
        visited_ms: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert a media row and return its id
    fn insert_media(&self, media: &NewMedia)
        -> impl Future<Output = Result<i64, StoreError>> + Send;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqlJournalStore {
    pool: SqlitePool,
}

impl SqlJournalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl JournalStore for SqlJournalStore {
    async fn latest_segment_id_for_country(&self, country: &str) -> Result<Option<i64>, StoreError> {
        let sql = queries::segments::select_latest_id_for_country(country);
        let id: Option<i64> = sqlx::query_scalar(&sql).fetch_optional(&self.pool).await?;
        Ok(id)
    }

    async fn insert_segment(&self, segment: &NewSegment) -> Result<i64, StoreError> {
        let sql = queries::segments::insert(
            &segment.name,
            &segment.country,
            segment.latitude,
            segment.longitude,
            segment.arrival_ms,
            None,
            segment.is_current,
        );
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    async fn clear_current_segments(&self) -> Result<(), StoreError> {
        let sql = queries::segments::clear_current_flags();
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_segments(&self) -> Result<Vec<Segment>, StoreError> {
        let sql = queries::segments::select_all_by_arrival();
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let segments = rows
            .iter()
            .map(|row| Segment {
                id: row.get("id"),
                name: row.get("name"),
                country: row.get("country"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                arrival_ms: row.get("arrival_ms"),
                departure_ms: row.get("departure_ms"),
                is_current: row.get::<i64, _>("is_current") != 0,
            })
            .collect();
        Ok(segments)
    }

    async fn list_places(&self) -> Result<Vec<Place>, StoreError> {
        let sql = queries::places::select_all();
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let places = rows
            .iter()
            .map(|row| Place {
                id: row.get("id"),
                segment_id: row.get("segment_id"),
                name: row.get("name"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                country: row.get("country"),
                first_visited_ms: row.get("first_visited_ms"),
                last_visited_ms: row.get("last_visited_ms"),
            })
            .collect();
        Ok(places)
    }

    async fn insert_place(&self, place: &NewPlace) -> Result<i64, StoreError> {
        let sql = queries::places::insert(
            place.segment_id,
            &place.name,
            place.latitude,
            place.longitude,
            &place.country,
            place.visited_ms,
        );
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    async fn touch_place_visit(&self, place_id: i64, visited_ms: i64) -> Result<(), StoreError> {
        let sql = queries::places::touch_last_visited(place_id, visited_ms);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_media(&self, media: &NewMedia) -> Result<i64, StoreError> {
        let sql = queries::media::insert(
            &media.user_id,
            media.media_type.as_str(),
            media.storage_path.as_deref(),
            media.description.as_deref(),
            media.taken_at_ms,
            media.latitude,
            media.longitude,
            media.segment_id,
            media.place_id,
            media.location_name.as_deref(),
        );
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }
}
