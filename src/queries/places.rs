use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Places;

/// INSERT INTO places (segment_id, name, latitude, longitude, country, first_visited_ms, last_visited_ms)
/// VALUES (?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    segment_id: i64,
    name: &str,
    latitude: f64,
    longitude: f64,
    country: &str,
    visited_ms: i64,
) -> String {
    Query::insert()
        .into_table(Places::Table)
        .columns([
            Places::SegmentId,
            Places::Name,
            Places::Latitude,
            Places::Longitude,
            Places::Country,
            Places::FirstVisitedMs,
            Places::LastVisitedMs,
        ])
        .values_panic([
            segment_id.into(),
            name.into(),
            latitude.into(),
            longitude.into(),
            country.into(),
            visited_ms.into(),
            visited_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, segment_id, name, latitude, longitude, country, first_visited_ms, last_visited_ms
/// FROM places ORDER BY id
///
/// Proximity matching scans every place, not only those under one segment,
/// so a border town photographed from the neighbouring country still matches.
pub fn select_all() -> String {
    Query::select()
        .columns([
            Places::Id,
            Places::SegmentId,
            Places::Name,
            Places::Latitude,
            Places::Longitude,
            Places::Country,
            Places::FirstVisitedMs,
            Places::LastVisitedMs,
        ])
        .from(Places::Table)
        .order_by(Places::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE places SET last_visited_ms = ? WHERE id = ?
pub fn touch_last_visited(id: i64, visited_ms: i64) -> String {
    Query::update()
        .table(Places::Table)
        .value(Places::LastVisitedMs, visited_ms)
        .and_where(Expr::col(Places::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}
