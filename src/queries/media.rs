use sea_query::{Query, SqliteQueryBuilder};

use crate::schema::Media;

/// INSERT INTO media (user_id, media_type, storage_path, description, taken_at_ms,
///     latitude, longitude, segment_id, place_id, location_name)
/// VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
#[allow(clippy::too_many_arguments)]
pub fn insert(
    user_id: &str,
    media_type: &str,
    storage_path: Option<&str>,
    description: Option<&str>,
    taken_at_ms: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    segment_id: Option<i64>,
    place_id: Option<i64>,
    location_name: Option<&str>,
) -> String {
    Query::insert()
        .into_table(Media::Table)
        .columns([
            Media::UserId,
            Media::MediaType,
            Media::StoragePath,
            Media::Description,
            Media::TakenAtMs,
            Media::Latitude,
            Media::Longitude,
            Media::SegmentId,
            Media::PlaceId,
            Media::LocationName,
        ])
        .values_panic([
            user_id.into(),
            media_type.into(),
            storage_path.into(),
            description.into(),
            taken_at_ms.into(),
            latitude.into(),
            longitude.into(),
            segment_id.into(),
            place_id.into(),
            location_name.into(),
        ])
        .to_string(SqliteQueryBuilder)
}
